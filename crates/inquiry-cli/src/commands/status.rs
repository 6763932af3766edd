use super::current_session;
use anyhow::Result;
use inquiry_infrastructure::InquiryPaths;

pub async fn run(paths: &InquiryPaths) -> Result<()> {
    let Some(session) = current_session(paths).await? else {
        println!("No active research session. Start one with `inquiry start <topic>`.");
        return Ok(());
    };

    println!("Research  {}", session.id);
    println!("Topic     {}", session.topic);
    println!("Updated   {}", session.updated_at);

    println!("\nGoals ({})", session.goals.len());
    for goal in &session.goals {
        println!("  - {goal}");
    }
    println!("Tasks ({})", session.tasks.len());
    for (i, task) in session.tasks.iter().enumerate() {
        println!("  {}. {task}", i + 1);
    }

    let filled = session
        .notes_categories
        .iter()
        .filter(|(_, c)| !c.content.trim().is_empty())
        .count();
    println!(
        "\nNotes            {} categories, {filled} with content",
        session.notes_categories.len()
    );
    println!(
        "Analysis         {} key terms, {} approaches",
        session.analysis.key_terms.len(),
        session.analysis.approaches.len()
    );
    println!("Recommendations  {}", session.recommendations.len());
    println!("Chat             {} messages", session.chat_transcript.len());

    if !session.uploaded_files.is_empty() {
        println!("\nFiles");
        for file in &session.uploaded_files {
            match &file.last_error {
                Some(error) => println!("  {}  {} ({error})", file.display_name, file.status),
                None => println!("  {}  {}", file.display_name, file.status),
            }
        }
    }

    let report = if session.generated_report.is_empty() {
        "not generated".to_string()
    } else {
        format!("{} characters", session.generated_report.chars().count())
    };
    let auto = if session.auto_update_report { "on" } else { "off" };
    println!("\nReport           {report}, auto-update {auto}");
    Ok(())
}
