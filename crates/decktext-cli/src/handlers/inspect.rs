use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer};
use anyhow::Result;
use std::path::Path;

pub fn handle(ctx: &ExecutionContext, apkg: &Path, limit: usize) -> Result<()> {
    let package = super::open_package(apkg)?;
    let notes = package.notes()?;

    let view_model = presenters::present_inspect(apkg, &package, &notes, limit);
    ConsoleRenderer::new(ctx.json()).render(CommandResultViewModel::new(view_model))
}
