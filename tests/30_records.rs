mod common;

use anyhow::Result;
use common::MockBackend;
use school_admin::resources::{ListQuery, SchoolClasses, Students, Teachers};
use school_admin::routes::{Collection, Route};
use school_admin::screens::{FormScreen, ListScreen, SubmitOutcome, GENERIC_ERROR};
use school_admin::ClientError;

#[tokio::test]
async fn duplicate_email_stays_on_the_form() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;

    let screen = FormScreen::create(app.resource::<Teachers>());
    let mut state = screen.mount().await?;
    state.set("name", "Ada")?;
    state.set("email", common::TAKEN_EMAIL)?;

    assert_eq!(screen.submit(&mut state).await, SubmitOutcome::Rejected);
    assert_eq!(state.error_for("email"), Some("The email has already been taken."));
    assert_eq!(state.general_error, None);
    assert_eq!(state.draft.name, "Ada");

    // Editing the field drops its stale error
    state.set("email", "ada@school.test")?;
    assert_eq!(state.error_for("email"), None);

    assert_eq!(
        screen.submit(&mut state).await,
        SubmitOutcome::Saved {
            redirect: Route::List(Collection::Teachers)
        }
    );
    assert_eq!(backend.hits_for("POST", "/api/teachers").len(), 2);
    Ok(())
}

#[tokio::test]
async fn errors_without_a_text_input_are_still_shown() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;
    let picture = common::picture();

    let screen = FormScreen::create(app.resource::<Teachers>());
    let mut state = screen.mount().await?;
    state.set("name", "Ada")?;
    state.set("email", common::BAD_PICTURE_EMAIL)?;
    state.set("profile_picture", &picture.path().to_string_lossy())?;

    assert_eq!(screen.submit(&mut state).await, SubmitOutcome::Rejected);

    // The picture error sits on the file input
    let view = state.view();
    assert_eq!(view.upload_field, Some("profile_picture"));
    assert_eq!(
        state.error_for("profile_picture"),
        Some("The profile picture must be an image.")
    );
    assert!(view.values.get("profile_picture").is_none());

    // A key no input renders becomes the form alert
    assert!(!view.errors.contains_key("school_id"));
    assert_eq!(view.general_error.as_deref(), Some("The selected school is closed."));
    Ok(())
}

#[tokio::test]
async fn blank_required_fields_send_nothing() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;

    let screen = FormScreen::create(app.resource::<Students>());
    let mut state = screen.mount().await?;
    state.set("name", "Kim")?;

    assert_eq!(screen.submit(&mut state).await, SubmitOutcome::Rejected);
    assert!(state.error_for("email").is_some());
    assert!(state.error_for("roll_number").is_some());
    assert!(state.error_for("date_of_birth").is_some());
    assert_eq!(state.error_for("name"), None);
    assert!(backend.hits_for("POST", "/api/students").is_empty());
    Ok(())
}

#[tokio::test]
async fn multipart_update_is_a_post_with_method_override() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;

    let picture = common::picture();

    let screen = FormScreen::edit(app.resource::<Teachers>(), "3");
    let mut state = screen.mount().await?;
    assert_eq!(state.draft.name, "Teacher 3");
    state.set("subject", "Physics")?;
    state.set("profile_picture", &picture.path().to_string_lossy())?;

    let outcome = screen.submit(&mut state).await;
    assert!(matches!(outcome, SubmitOutcome::Saved { .. }));

    assert_eq!(backend.hits_for("POST", "/api/teachers/3").len(), 1);
    assert!(backend.hits_for("PUT", "/api/teachers/3").is_empty());

    let submission = backend
        .submissions()
        .into_iter()
        .find(|s| s.path == "/api/teachers/3")
        .expect("update reached the backend");
    assert_eq!(submission.fields["_method"], "PUT");
    assert_eq!(submission.fields["subject"], "Physics");
    assert!(submission.fields["profile_picture"].starts_with("file:"));
    Ok(())
}

#[tokio::test]
async fn class_forms_submit_json() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;

    let screen = FormScreen::create(app.resource::<SchoolClasses>());
    let mut state = screen.mount().await?;
    state.set("name", "Grade 6")?;
    state.set("numeric_name", "6")?;
    let teacher_id = state.choices[0].value.clone();
    state.set("class_teacher_id", &teacher_id)?;

    assert!(matches!(screen.submit(&mut state).await, SubmitOutcome::Saved { .. }));

    let submission = &backend.submissions()[0];
    assert_eq!(submission.path, "/api/school-classes");
    assert_eq!(submission.fields["capacity"], "40");
    assert_eq!(submission.fields["class_teacher_id"], "1");

    let edit = FormScreen::edit(app.resource::<SchoolClasses>(), "2");
    let mut state = edit.mount().await?;
    state.set("capacity", "35")?;
    assert!(matches!(edit.submit(&mut state).await, SubmitOutcome::Saved { .. }));
    assert_eq!(backend.hits_for("PUT", "/api/school-classes/2").len(), 1);
    Ok(())
}

#[tokio::test]
async fn unexpected_failures_show_the_generic_message() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;

    // The mock has no update route for students
    let screen = FormScreen::edit(app.resource::<Students>(), "4");
    let mut state = screen.mount().await?;
    assert_eq!(screen.submit(&mut state).await, SubmitOutcome::Rejected);
    assert_eq!(state.general_error.as_deref(), Some(GENERIC_ERROR));
    assert!(state.errors.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_from_the_list_refetches_it() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();
    backend.login_as(&app, "super_admin").await;

    let screen = ListScreen::new(app.resource::<Teachers>(), ListQuery::default());
    screen.mount().await?;
    let view = screen.delete("2").await?;

    assert_eq!(view.rows.len(), 2);
    assert_eq!(backend.hits_for("DELETE", "/api/teachers/2").len(), 1);
    assert_eq!(backend.hits_for("GET", "/api/teachers").len(), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_fields_are_rejected_locally() -> Result<()> {
    let backend = MockBackend::start().await?;
    let app = backend.app();

    let screen = FormScreen::create(app.resource::<Teachers>());
    let mut state = screen.mount().await?;
    let err = state.set("salary", "1000").unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
    assert!(backend.hits().is_empty());
    Ok(())
}
