//! Signup form against an in-process fake API
//!
//! Run with `RUST_LOG=formix=debug` to see submission logs. With
//! `FORMIX_API_URL` set, a last submission is POSTed to `<url>/users`.

use formix::config::BASE_URL_ENV;
use formix::validation::rules;
use formix::{
    ApiClientTrait, ApiConfig, ApiError, ApiResponse, FieldErrors, FormController, FormOptions,
    HttpApiClient, Submission, SubmissionError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Serialize, Deserialize, garde::Validate)]
struct SignupDto {
    #[garde(custom(rules::not_blank), length(min = 2))]
    name: String,
    #[garde(email)]
    email: String,
}

/// Pretend server: rejects one address, is down for another
async fn create_user(payload: Value) -> Result<ApiResponse<Value>, ApiError> {
    match payload["email"].as_str() {
        Some("taken@example.com") => Err(ApiError::Response {
            status: 422,
            body: json!({ "validations": { "email": ["Email is already registered"] } }),
        }),
        Some("down@example.com") => Err(ApiError::Response {
            status: 503,
            body: json!({ "message": "Server unavailable" }),
        }),
        _ => Ok(ApiResponse {
            status: 201,
            data: json!({ "id": 1, "name": payload["name"] }),
        }),
    }
}

fn normalize_email(mut values: formix::Values) -> formix::Values {
    if let Some(email) = values.get("email").and_then(Value::as_str) {
        let email = email.trim().to_lowercase();
        values.insert("email".into(), email.into());
    }
    values
}

fn report(form: &FormController, result: Result<Value, SubmissionError>) {
    match result {
        Ok(user) => {
            form.set_is_completed(true);
            println!("created: {user}");
        }
        Err(e @ SubmissionError::Validation(_)) => {
            // Already written to the form state by process_form
            print_errors(&e.to_field_errors().unwrap_or_default());
        }
        Err(e @ SubmissionError::ServerValidation(_)) => {
            let errors = e.to_field_errors().unwrap_or_default();
            form.set_errors(errors.clone());
            print_errors(&errors);
        }
        Err(SubmissionError::Remote(message)) => println!("server said: {message}"),
        Err(other) => println!("failed: {other}"),
    }
}

fn print_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter().filter(|(_, m)| !m.is_empty()) {
        println!("  {field}: {message}");
    }
}

async fn submit(form: &FormController) {
    let result = form
        .process_form(Submission::<SignupDto, _>::new(create_user).pre_call(normalize_email))
        .await;
    report(form, result);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formix=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let initial_errors: FieldErrors = [("name", ""), ("email", "")].into_iter().collect();
    let form = FormController::new(FormOptions::from_struct(
        &SignupDto::default(),
        initial_errors,
    )?);

    let mut updates = form.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let loading = updates.borrow_and_update().is_loading;
            tracing::debug!("state changed, loading={loading}");
        }
    });

    println!("empty form:");
    submit(&form).await;

    form.on_change("name", "Alice");
    form.on_change("email", "Taken@Example.com ");
    println!("taken email:");
    submit(&form).await;

    form.on_change("email", "down@example.com");
    println!("server down:");
    submit(&form).await;

    form.on_change("email", "alice@example.com");
    println!("valid:");
    submit(&form).await;
    println!("completed: {}", form.is_completed());

    if std::env::var(BASE_URL_ENV).is_ok() {
        let client = HttpApiClient::new(&ApiConfig::load()?)?;
        println!("sending to {}:", client.base_url());
        let result = form
            .process_form(Submission::<SignupDto, _>::new(|payload| async move {
                client.post("/users", payload).await
            }))
            .await;
        report(&form, result);
    }

    drop(form);
    watcher.await?;
    Ok(())
}
