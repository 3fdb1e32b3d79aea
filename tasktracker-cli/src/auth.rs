use crate::config::Environment;
use tasktracker_error::{bail, ErrorType, Result};
use tasktracker_service::auth::AuthService;
use tasktracker_type::auth::{LoginRequest, RegisterRequest};

fn credentials(env: &Environment) -> Result<(&str, &str)> {
    let (Some(username), Some(password)) = (&env.username, &env.password) else {
        bail!(
            type = ErrorType::Unauthorized,
            "TASKTRACKER_USERNAME and TASKTRACKER_PASSWORD have to be set"
        );
    };

    Ok((username.as_str(), password.as_str()))
}

/// Open a session with the credentials from the environment
pub async fn login(auth: &AuthService, env: &Environment) -> Result<()> {
    let (username, password) = credentials(env)?;
    let request = LoginRequest::builder()
        .username(username)
        .password(password)
        .build();

    let response = auth.login(&request).await?;
    if !response.success {
        bail!(type = ErrorType::Unauthorized, response.message);
    }

    Ok(())
}

pub async fn register(
    auth: &AuthService,
    env: &Environment,
    username: String,
    email: String,
) -> Result<()> {
    let Some(ref password) = env.password else {
        bail!(type = ErrorType::BadRequest(None), "TASKTRACKER_PASSWORD has to be set");
    };

    let request = RegisterRequest::builder()
        .username(username)
        .email(email)
        .password(password.as_str())
        .build();
    let response = auth.register(&request).await?;

    if response.success {
        println!("{}", response.message);
    } else {
        eprintln!("Registration failed: {}", response.message);
    }

    Ok(())
}

pub async fn me(auth: &AuthService) -> Result<()> {
    let response = auth.current_user().await;
    if !response.success {
        eprintln!("{}", response.message);
        return Ok(());
    }

    let username = response.username.as_deref().unwrap_or("<unknown>");
    match response.role {
        Some(ref role) => println!("Logged in as \"{username}\" ({role})"),
        None => println!("Logged in as \"{username}\""),
    }

    Ok(())
}

pub async fn logout(auth: &AuthService) {
    let response = auth.logout().await;
    println!("{}", response.message);
}
