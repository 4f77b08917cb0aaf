use clap::Subcommand;
use habitboard_core::cache::FileCache;

#[derive(Subcommand)]
pub enum CacheAction {
    /// Remove every cached response
    Clear,
    /// Print the cache directory location
    Path,
}

pub fn run(action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let cache = FileCache::open_default()?;

    match action {
        CacheAction::Clear => {
            let removed = cache.clear()?;
            println!("removed {removed} cached responses");
        }
        CacheAction::Path => {
            println!("{}", cache.dir().display());
        }
    }
    Ok(())
}
