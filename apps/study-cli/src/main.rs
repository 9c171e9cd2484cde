#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    word_deck_study_cli::run().await
}
