use crate::reports;
use clap::Args;
use shellforge::catalog::{ModuleCatalog, ModuleKind};
use shellforge::error::SfResult;

#[derive(Args, Debug, Clone)]
pub struct ModulesArgs {
    /// Only list modules of this kind (head, body, base).
    #[arg(long)]
    pub kind: Option<ModuleKind>,
}

pub fn run(args: ModulesArgs, catalog: &ModuleCatalog) -> SfResult<()> {
    reports::print_catalog(catalog, args.kind);
    Ok(())
}
