use hnfeed::error::FeedError;

#[tokio::main]
async fn main() -> Result<(), FeedError> {
    hnfeed::app::run().await
}
