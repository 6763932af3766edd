//! End-to-end workflow scenarios against scripted collaborators.

mod support;

use inquiry_core::collaborator::{CollaboratorError, ProposedRecommendation};
use inquiry_core::error::InquiryError;
use inquiry_core::report::ReportSettings;
use inquiry_core::session::{FileStatus, Priority, SessionStore};
use inquiry_core::workflow::{ResearchTab, View};
use support::{controller_with, harness, harness_with_store, ScriptedBackend};

#[tokio::test]
async fn suggested_topic_becomes_the_session_topic() {
    let h = harness();
    h.backend
        .refine(Ok("The Impact of Artificial Intelligence on Modern Education Systems"));
    h.backend.plan(
        &["Understand AI adoption in schools"],
        &["Survey teachers", "Review case studies"],
    );

    let candidate = h
        .controller
        .submit_topic("AI in education")
        .await
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(candidate.original, "AI in education");
    assert_eq!(h.controller.view().await, View::AwaitingTopicChoice);

    let id = h.controller.use_suggested().await.unwrap().applied().unwrap();
    assert_eq!(h.controller.view().await, View::research(ResearchTab::Notes));
    assert!(h.controller.candidate_topic().await.is_none());

    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(
        session.topic,
        "The Impact of Artificial Intelligence on Modern Education Systems"
    );
    assert_eq!(session.goals, ["Understand AI adoption in schools"]);
    assert_eq!(session.tasks, ["Survey teachers", "Review case studies"]);

    h.controller.flush().await;
    let persisted = h.store.load(&id).await.unwrap().unwrap();
    assert_eq!(persisted, session);
    assert_eq!(h.store.active_session_id().await.unwrap(), Some(id));
}

#[tokio::test]
async fn blank_topic_is_rejected_without_calls() {
    let h = harness();
    let err = h.controller.submit_topic("   ").await.unwrap_err();
    assert!(err.is_validation());
    assert!(h.backend.calls().is_empty());
    assert_eq!(h.controller.view().await, View::Search);
}

#[tokio::test]
async fn missing_api_key_is_rejected_before_refinement() {
    let backend = ScriptedBackend::new();
    let store = std::sync::Arc::new(inquiry_infrastructure::MemorySessionStore::new());
    let controller = controller_with(store, backend.clone(), "");

    let err = controller.submit_topic("AI in education").await.unwrap_err();
    assert!(err.is_validation());
    assert!(backend.calls().is_empty());
    assert!(controller.recent_topics().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_refinement_stays_in_search() {
    let h = harness();
    h.backend.refine(Err(CollaboratorError::Unauthorized));

    let err = h.controller.submit_topic("AI in education").await.unwrap_err();
    assert_eq!(err, InquiryError::Collaborator(CollaboratorError::Unauthorized));
    assert_eq!(h.controller.view().await, View::Search);
    assert!(h.controller.candidate_topic().await.is_none());
    // The submit was accepted, so the topic is remembered.
    assert_eq!(h.controller.recent_topics().await.unwrap(), ["AI in education"]);
}

#[tokio::test]
async fn failed_commit_keeps_the_previous_session() {
    let h = harness();
    let id = h.start_research("Soil erosion").await;
    let before = h.controller.snapshot().await.unwrap();

    h.controller.go_to_search().await;
    h.backend.refine(Ok("Urban heat islands in Europe"));
    h.backend
        .plan_fails(CollaboratorError::invalid_format("plan has no goals"));
    h.controller.submit_topic("Urban heat").await.unwrap();

    let err = h.controller.use_suggested().await.unwrap_err();
    assert!(err.is_collaborator());
    assert!(matches!(h.controller.view().await, View::Error { .. }));
    assert!(h.controller.candidate_topic().await.is_none());

    let after = h.controller.snapshot().await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after.id, id);

    assert_eq!(
        h.controller.dismiss_error().await.unwrap(),
        View::research(ResearchTab::Notes)
    );
}

#[tokio::test]
async fn failed_first_commit_dismisses_to_search() {
    let h = harness();
    h.backend.refine(Ok("Refined"));
    h.backend.plan_fails(CollaboratorError::Transport("connection refused".into()));
    h.controller.submit_topic("Topic").await.unwrap();

    assert!(h.controller.keep_original().await.is_err());
    assert!(h.controller.snapshot().await.is_none());
    assert_eq!(h.controller.dismiss_error().await.unwrap(), View::Search);
}

#[tokio::test]
async fn same_topic_reuses_the_research_id() {
    let h = harness();
    let first = h.start_research("Soil erosion").await;
    h.controller.set_notes("general", "field notes").await.unwrap();

    h.controller.go_to_search().await;
    h.backend.refine(Ok("Soil erosion in river basins"));
    h.backend.plan(&["New goal"], &["New task"]);
    h.controller.submit_topic("Soil erosion").await.unwrap();
    let second = h.controller.keep_original().await.unwrap().applied().unwrap();

    assert_eq!(first, second);
    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(session.goals, ["New goal"]);
    assert_eq!(
        session.notes_categories.get("general").unwrap().content,
        "field notes"
    );
}

#[tokio::test]
async fn new_topic_mints_a_fresh_session() {
    let h = harness();
    let first = h.start_research("Soil erosion").await;
    h.controller.set_notes("general", "old notes").await.unwrap();

    h.controller.go_to_search().await;
    let second = h.start_research("Coral bleaching").await;

    assert_ne!(first, second);
    let session = h.controller.snapshot().await.unwrap();
    assert!(session
        .notes_categories
        .iter()
        .all(|(_, category)| category.content.is_empty()));

    h.controller.flush().await;
    assert!(h.store.load(&first).await.unwrap().is_none());
    assert_eq!(h.store.active_session_id().await.unwrap(), Some(second));
}

#[tokio::test]
async fn reset_twice_is_a_no_op_and_removes_the_snapshot() {
    let h = harness();
    h.controller.reset_research().await;
    h.controller.reset_research().await;
    h.controller.flush().await;
    assert!(h.store.is_empty().await);

    let id = h.start_research("Soil erosion").await;
    h.controller.reset_research().await;
    h.controller.reset_research().await;
    h.controller.flush().await;

    assert_eq!(h.controller.view().await, View::Search);
    assert!(h.controller.snapshot().await.is_none());
    assert!(h.store.load(&id).await.unwrap().is_none());
    assert!(h.store.active_session_id().await.unwrap().is_none());
}

#[tokio::test]
async fn upload_then_vectorize_retry() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.controller
        .navigate(View::Files)
        .await
        .unwrap();

    h.backend.upload(Ok(("file-a", "a.pdf")));
    let file_id = h
        .controller
        .upload_file("a.pdf", b"%PDF".to_vec())
        .await
        .unwrap()
        .applied()
        .unwrap();
    let status = |s: &inquiry_core::session::ResearchSession| s.file(&file_id).unwrap().status;
    assert_eq!(status(&h.controller.snapshot().await.unwrap()), FileStatus::Uploaded);

    h.backend.vectorize(Err(CollaboratorError::Server {
        status: 503,
        message: "busy".into(),
    }));
    assert!(h.controller.vectorize_file(&file_id).await.is_err());
    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(status(&session), FileStatus::Error);
    assert!(session.file(&file_id).unwrap().last_error.is_some());
    assert_eq!(h.controller.view().await, View::Files);

    h.backend.vectorize(Ok(()));
    h.controller.vectorize_file(&file_id).await.unwrap();
    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(status(&session), FileStatus::Vectorized);
    assert!(session.file(&file_id).unwrap().last_error.is_none());

    let err = h.controller.vectorize_file(&file_id).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(status(&h.controller.snapshot().await.unwrap()), FileStatus::Vectorized);
}

#[tokio::test]
async fn failed_upload_is_listed_with_error_status() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.backend
        .upload(Err(CollaboratorError::Transport("reset by peer".into())));

    assert!(h.controller.upload_file("b.docx", vec![1, 2]).await.is_err());
    let session = h.controller.snapshot().await.unwrap();
    let file = &session.uploaded_files[0];
    assert_eq!(file.display_name, "b.docx");
    assert_eq!(file.status, FileStatus::Error);
    assert!(!file.stored);
    assert_eq!(h.controller.view().await, View::research(ResearchTab::Notes));

    let err = h.controller.vectorize_file(&file.id).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn removing_files_drops_them_from_the_list() {
    let h = harness();
    let id = h.start_research("Soil erosion").await;
    h.controller.navigate(View::Files).await.unwrap();
    h.backend.upload(Ok(("file-a", "a.pdf")));
    h.controller.upload_file("a.pdf", vec![1]).await.unwrap();
    h.backend
        .upload(Err(CollaboratorError::Transport("reset by peer".into())));
    assert!(h.controller.upload_file("b.pdf", vec![2]).await.is_err());
    let failed_id = h.controller.snapshot().await.unwrap().uploaded_files[1].id.clone();

    h.backend.delete(Err(CollaboratorError::Server {
        status: 500,
        message: "locked".into(),
    }));
    assert!(h.controller.remove_file("file-a").await.is_err());
    assert!(h.controller.snapshot().await.unwrap().file("file-a").is_some());

    h.backend.delete(Ok(()));
    assert!(h.controller.remove_file("file-a").await.unwrap().is_applied());
    // A file that never reached the backend is dropped without a call.
    assert!(h.controller.remove_file(&failed_id).await.unwrap().is_applied());
    assert_eq!(
        h.backend.calls().iter().filter(|c| c.as_str() == "delete").count(),
        2
    );

    let session = h.controller.snapshot().await.unwrap();
    assert!(session.uploaded_files.is_empty());
    assert_eq!(h.controller.view().await, View::Files);
    assert!(h.controller.remove_file("file-a").await.unwrap_err().is_not_found());

    h.controller.flush().await;
    assert!(h.store.load(&id).await.unwrap().unwrap().uploaded_files.is_empty());
}

#[tokio::test]
async fn blank_annotation_is_not_stored() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.backend.upload(Ok(("file-a", "a.pdf")));
    h.controller.upload_file("a.pdf", vec![0]).await.unwrap();
    h.backend.annotation("   ");

    let err = h.controller.generate_annotation("file-a").await.unwrap_err();
    assert!(err.is_collaborator());
    assert!(h
        .controller
        .snapshot()
        .await
        .unwrap()
        .file("file-a")
        .unwrap()
        .annotation
        .is_none());
}

#[tokio::test]
async fn concurrent_uploads_both_land_in_the_file_list() {
    let h = harness();
    h.start_research("Soil erosion").await;

    let gate = h.backend.hold_next_call();
    // Scripts are consumed in completion order: the held call answers last.
    h.backend.upload(Ok(("file-b", "b.pdf")));
    h.backend.upload(Ok(("file-a", "a.pdf")));
    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.upload_file("a.pdf", vec![1]).await });
    gate.entered.notified().await;

    // The second upload completes while the first is still pending.
    let second = h.controller.upload_file("b.pdf", vec![2]).await.unwrap();
    assert_eq!(second.applied().as_deref(), Some("file-b"));
    gate.release.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.applied().as_deref(), Some("file-a"));

    let session = h.controller.snapshot().await.unwrap();
    let ids: Vec<&str> = session.uploaded_files.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["file-b", "file-a"]);
    assert!(session
        .uploaded_files
        .iter()
        .all(|f| f.status == FileStatus::Uploaded));
}

#[tokio::test]
async fn annotation_is_stored_on_the_file() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.backend.upload(Ok(("file-a", "a.pdf")));
    h.controller.upload_file("a.pdf", vec![0]).await.unwrap();
    h.backend.annotation("A study of erosion rates.");

    h.controller.generate_annotation("file-a").await.unwrap();
    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(
        session.file("file-a").unwrap().annotation.as_deref(),
        Some("A study of erosion rates.")
    );
}

#[tokio::test]
async fn chat_keeps_user_message_when_assistant_fails() {
    let h = harness();
    h.start_research("Soil erosion").await;

    h.backend.reply(Err(CollaboratorError::Transport("timeout".into())));
    assert!(h.controller.send_chat_message("first?").await.is_err());
    h.backend.reply(Ok("An answer."));
    let reply = h
        .controller
        .send_chat_message("second?")
        .await
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(reply, "An answer.");

    let transcript = h.controller.snapshot().await.unwrap().chat_transcript;
    let contents: Vec<&str> = transcript.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["first?", "second?", "An answer."]);
    assert_eq!(h.controller.view().await, View::research(ResearchTab::Notes));
}

#[tokio::test]
async fn regenerate_plan_replaces_goals_and_keeps_id() {
    let h = harness();
    let id = h.start_research("Soil erosion").await;
    h.controller.navigate(View::Goals).await.unwrap();
    h.controller
        .set_goals(vec!["Edited goal".into()])
        .await
        .unwrap();

    h.backend.plan(&["Fresh goal"], &["Fresh task"]);
    assert!(h.controller.regenerate_plan().await.unwrap().is_applied());

    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(session.id, id);
    assert_eq!(session.goals, ["Fresh goal"]);
    assert_eq!(session.tasks, ["Fresh task"]);
}

#[tokio::test]
async fn failed_regeneration_goes_to_error_with_session_unchanged() {
    let h = harness();
    h.start_research("Soil erosion").await;
    let before = h.controller.snapshot().await.unwrap();

    h.backend.plan_fails(CollaboratorError::Unauthorized);
    assert!(h.controller.regenerate_plan().await.is_err());

    assert!(matches!(h.controller.view().await, View::Error { .. }));
    assert_eq!(h.controller.snapshot().await.unwrap(), before);
}

#[tokio::test]
async fn generated_recommendations_replace_the_list() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.controller
        .add_recommendation("Old idea", Priority::Low)
        .await
        .unwrap();

    h.backend.recommendations(vec![
        ProposedRecommendation {
            text: "Measure runoff".into(),
            priority: Priority::High,
        },
        ProposedRecommendation {
            text: "  ".into(),
            priority: Priority::Low,
        },
    ]);
    let count = h
        .controller
        .generate_recommendations()
        .await
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(count, 1);
    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(session.recommendations[0].text, "Measure runoff");
    assert_eq!(session.recommendations[0].priority, Priority::High);
}

#[tokio::test]
async fn settings_change_filters_a_generated_report_without_replacing_it() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.controller.set_auto_update(true).await.unwrap();
    let settings = ReportSettings {
        use_rag: true,
        ..ReportSettings::default()
    };
    h.controller
        .update_report_settings(settings.clone())
        .await
        .unwrap();
    let document = "## Goals\n\nBackend goals\n## Заметки\n\nBackend notes\n";
    h.backend.report(Ok(document));
    h.controller.generate_report().await.unwrap();

    h.controller
        .update_report_settings(ReportSettings {
            include_notes: false,
            ..settings
        })
        .await
        .unwrap();

    assert_eq!(h.controller.snapshot().await.unwrap().generated_report, document);
    assert_eq!(
        h.controller.rendered_report().await.unwrap(),
        "## Goals\n\nBackend goals\n"
    );
}

#[tokio::test]
async fn failed_report_generation_keeps_report_and_view() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.controller
        .navigate(View::research(ResearchTab::Report))
        .await
        .unwrap();
    h.controller.edit_report("## Goals\n\nDraft\n").await.unwrap();
    h.controller
        .update_report_settings(ReportSettings {
            use_rag: true,
            ..ReportSettings::default()
        })
        .await
        .unwrap();

    h.backend.report(Err(CollaboratorError::Server {
        status: 502,
        message: "upstream".into(),
    }));
    let err = h.controller.generate_report().await.unwrap_err();
    assert!(err.is_collaborator());

    assert_eq!(
        h.controller.snapshot().await.unwrap().generated_report,
        "## Goals\n\nDraft\n"
    );
    assert_eq!(h.controller.view().await, View::research(ResearchTab::Report));
    // The flag is released, so a retry goes through.
    h.backend.report(Ok("## Goals\n\nSecond try\n"));
    assert!(h.controller.generate_report().await.unwrap().is_applied());
}

#[tokio::test]
async fn edited_report_is_rendered_with_current_settings() {
    let h = harness();
    let id = h.start_research("Soil erosion").await;
    h.controller
        .edit_report("# Report\n## Notes\nmine\n## Recommendations\n- plant trees\n")
        .await
        .unwrap();
    h.controller
        .update_report_settings(ReportSettings {
            include_recommendations: false,
            ..ReportSettings::default()
        })
        .await
        .unwrap();

    assert_eq!(
        h.controller.rendered_report().await.unwrap(),
        "# Report\n## Notes\nmine\n"
    );
    h.controller.flush().await;
    let persisted = h.store.load(&id).await.unwrap().unwrap();
    assert!(persisted.generated_report.contains("plant trees"));
}

#[tokio::test]
async fn empty_recommendation_answer_keeps_the_list() {
    let h = harness();
    h.start_research("Soil erosion").await;
    h.controller
        .add_recommendation("Keep me", Priority::Medium)
        .await
        .unwrap();

    h.backend.recommendations(Vec::new());
    let err = h.controller.generate_recommendations().await.unwrap_err();
    assert!(err.is_collaborator());

    let session = h.controller.snapshot().await.unwrap();
    assert_eq!(session.recommendations.len(), 1);
    assert_eq!(session.recommendations[0].text, "Keep me");
}

#[tokio::test]
async fn rehydration_enters_research() {
    let h = harness();
    let id = h.start_research("Soil erosion").await;
    h.controller.set_notes("general", "kept").await.unwrap();
    h.controller.flush().await;

    let restarted = harness_with_store(h.store.clone());
    let view = restarted.controller.bootstrap().await;

    assert_eq!(view, View::research(ResearchTab::Notes));
    let session = restarted.controller.snapshot().await.unwrap();
    assert_eq!(session.id, id);
    assert_eq!(session.notes_categories.get("general").unwrap().content, "kept");
}

#[tokio::test]
async fn bootstrap_without_snapshot_starts_in_search() {
    let h = harness();
    assert_eq!(h.controller.bootstrap().await, View::Search);
    assert!(h.controller.snapshot().await.is_none());
}

#[tokio::test]
async fn navigation_requires_a_session_view() {
    let h = harness();
    let err = h.controller.navigate(View::Files).await.unwrap_err();
    assert!(err.is_invalid_transition());

    h.start_research("Soil erosion").await;
    h.controller
        .navigate(View::research(ResearchTab::Analysis))
        .await
        .unwrap();
    assert!(h.controller.navigate(View::Search).await.is_err());

    h.controller.go_to_search().await;
    assert_eq!(h.controller.view().await, View::Search);
    assert!(h.controller.snapshot().await.is_some());
    assert_eq!(
        h.controller.resume_research().await.unwrap(),
        View::research(ResearchTab::Analysis)
    );
}

#[tokio::test]
async fn cancel_topic_choice_returns_to_search() {
    let h = harness();
    h.backend.refine(Ok("Refined"));
    h.controller.submit_topic("Topic").await.unwrap();

    h.controller.cancel_topic_choice().await.unwrap();
    assert_eq!(h.controller.view().await, View::Search);
    assert!(h.controller.candidate_topic().await.is_none());
    assert!(h.controller.keep_original().await.unwrap_err().is_invalid_transition());
}

#[tokio::test]
async fn recent_topics_are_most_recent_first() {
    let h = harness();
    for topic in ["a", "b", "a"] {
        h.backend.refine(Ok("refined"));
        h.controller.submit_topic(topic).await.unwrap();
        h.controller.cancel_topic_choice().await.unwrap();
    }
    assert_eq!(h.controller.recent_topics().await.unwrap(), ["a", "b"]);
}
