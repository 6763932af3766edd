use super::{finish, open_controller};
use anyhow::{Result, bail};
use inquiry_infrastructure::InquiryPaths;

pub async fn run(paths: &InquiryPaths, topic: &str, suggested: bool) -> Result<()> {
    let controller = open_controller(paths).await?;
    controller.go_to_search().await;

    let Some(candidate) = controller.submit_topic(topic).await?.applied() else {
        bail!("Topic refinement was superseded");
    };
    println!("Original:  {}", candidate.original);
    println!("Suggested: {}", candidate.suggested);

    let committed = if suggested {
        controller.use_suggested().await
    } else {
        controller.keep_original().await
    };
    let committed = match committed {
        Ok(outcome) => outcome,
        Err(e) => {
            finish(&controller).await;
            return Err(e.into());
        }
    };
    if committed.applied().is_none() {
        bail!("Topic commit was superseded");
    }

    if let Some(session) = controller.snapshot().await {
        println!("\nResearch {} started: {}", session.id, session.topic);
        println!("Goals:");
        for goal in &session.goals {
            println!("  - {goal}");
        }
        println!("Tasks:");
        for (i, task) in session.tasks.iter().enumerate() {
            println!("  {}. {task}", i + 1);
        }
    }
    finish(&controller).await;
    Ok(())
}
