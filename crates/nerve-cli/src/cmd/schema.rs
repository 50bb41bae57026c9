use anyhow::{Context, Result};

use crate::args::StoreArgs;

pub fn run(args: &StoreArgs) -> Result<()> {
    let config = args.config();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let store = nerve_core::store::open(&config);
        store
            .ensure_schema()
            .await
            .context("could not create the truths and dares tables")?;
        println!("schema ready ({} backend)", store.backend());
        Ok::<_, anyhow::Error>(())
    })
}
