use anyhow::Result;
use inquiry_core::recent::RecentTopicsRepository;
use inquiry_infrastructure::{FileRecentTopicsRepository, InquiryPaths};

pub async fn run(paths: &InquiryPaths) -> Result<()> {
    let recent = FileRecentTopicsRepository::new(paths).load().await?;
    if recent.topics().is_empty() {
        println!("No recent topics.");
        return Ok(());
    }
    for (i, topic) in recent.topics().iter().enumerate() {
        println!("{}. {topic}", i + 1);
    }
    Ok(())
}
