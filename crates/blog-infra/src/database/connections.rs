use std::time::Duration;

#[cfg(feature = "mongo")]
use bson::{Document, doc};
#[cfg(feature = "mongo")]
use mongodb::options::{ClientOptions, IndexOptions};
#[cfg(feature = "mongo")]
use mongodb::{Client, Database, IndexModel};

#[cfg(feature = "mongo")]
use super::document::POSTS_COLLECTION;

/// Configuration for the document store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database: String,
    pub connect_timeout: Duration,
    pub max_pool_size: u32,
}

impl DatabaseConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            connect_timeout: Duration::from_secs(10),
            max_pool_size: 100,
        }
    }
}

/// Shared connection to the document store.
///
/// Created once at start-up; the driver client pools connections internally
/// and is safe for concurrent use from every request task.
///
/// # Example
/// ```ignore
/// let connections = DatabaseConnections::init(&config).await?;
/// let store = MongoPostStore::new(&connections.main);
/// ```
#[cfg(feature = "mongo")]
pub struct DatabaseConnections {
    pub client: Client,
    /// Database holding the `posts` collection.
    pub main: Database,
}

#[cfg(not(feature = "mongo"))]
pub struct DatabaseConnections;

#[cfg(feature = "mongo")]
impl DatabaseConnections {
    /// Connect, ping and make sure the indexes listing relies on exist.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        tracing::info!("Initializing database connection...");

        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some("blog-api".to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);
        options.max_pool_size = Some(config.max_pool_size);

        let client = Client::with_options(options)?;
        let main = client.database(&config.database);

        main.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(
            database = %config.database,
            pool = config.max_pool_size,
            "Database connected"
        );

        ensure_indexes(&main).await?;

        Ok(Self { client, main })
    }
}

/// Text index over title/content and the publish ordering index.
///
/// Creating an index that already exists with the same spec is a no-op.
#[cfg(feature = "mongo")]
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let posts = db.collection::<Document>(POSTS_COLLECTION);

    let indexes = vec![
        IndexModel::builder()
            .keys(doc! { "title": "text", "content": "text" })
            .options(
                IndexOptions::builder()
                    .name("text_title_content".to_string())
                    .build(),
            )
            .build(),
        IndexModel::builder()
            .keys(doc! { "published": 1, "publishedAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("idx_published_publishedAt".to_string())
                    .build(),
            )
            .build(),
    ];

    posts.create_indexes(indexes).await?;
    tracing::info!(collection = POSTS_COLLECTION, "Indexes ensured");
    Ok(())
}
