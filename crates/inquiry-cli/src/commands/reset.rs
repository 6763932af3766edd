use super::{finish, open_controller};
use anyhow::Result;
use inquiry_infrastructure::InquiryPaths;

pub async fn run(paths: &InquiryPaths) -> Result<()> {
    let controller = open_controller(paths).await?;
    match controller.snapshot().await {
        Some(session) => {
            controller.reset_research().await;
            println!("Discarded research {} ({})", session.id, session.topic);
        }
        None => println!("No active research session."),
    }
    finish(&controller).await;
    Ok(())
}
