//! Creates a group
//!
//! Groups have no HTTP surface; operators add them with this tool.
//!
//! ```bash
//! cargo run --bin blog-seed -- cats "Cats" "Posts about cats"
//! ```

use anyhow::{bail, Context};

use domain_blog::ports::GroupPort;
use domain_blog::NewGroup;
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBlogStore};
use interface_web::config::WebConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(slug), Some(title)) = (args.next(), args.next()) else {
        bail!("usage: blog-seed <slug> <title> [description]");
    };
    let description = args.next().unwrap_or_default();

    let config = WebConfig::from_env().unwrap_or_default();

    println!("Connecting to database...");
    let pool = create_pool(DatabaseConfig::new(&config.database_url).max_connections(1))
        .await
        .context("connecting to database")?;
    run_migrations(&pool).await?;
    let store = PostgresBlogStore::new(pool);

    if let Some(existing) = store.find_group_by_slug(&slug).await? {
        println!("Group '{}' already exists ({})", existing.slug, existing.title);
        return Ok(());
    }

    let group = store
        .create_group(NewGroup::new(title, slug, description))
        .await?;
    println!("Created group '{}' ({})", group.slug, group.title);
    Ok(())
}
