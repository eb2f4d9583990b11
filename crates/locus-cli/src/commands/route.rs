//! `locus route` and `locus routes`

use locus_core::error::LocusResult;
use locus_router::{RouteMatch, RouteTable};

use super::CommandContext;

/// Show the layout and page a location mounts
pub async fn resolve(path: String, ctx: &CommandContext) -> LocusResult<()> {
    let table = RouteTable::app_routes();
    let matched = table.require(&path)?;
    ctx.output.print(&describe(&matched));
    Ok(())
}

/// List every route of the application
pub async fn list(ctx: &CommandContext) -> LocusResult<()> {
    let table = RouteTable::app_routes();
    for (path, layout, page) in table.entries() {
        let line = match layout {
            Some(layout) => format!("{:<12} {} > {}", path, layout, page),
            None => format!("{:<12} {}", path, page),
        };
        ctx.output.print(&line);
    }
    Ok(())
}

pub fn describe(matched: &RouteMatch) -> String {
    match matched.layout {
        Some(layout) => format!("{} -> {} > {}", matched.path, layout, matched.page),
        None => format!("{} -> {}", matched.path, matched.page),
    }
}
