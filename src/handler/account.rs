use bcrypt::{hash, verify, DEFAULT_COST};

use crate::{
    auth::GoogleIdentity,
    configuration::State,
    error::{Error, FieldErrors},
    model::{NewUser, User},
    types::{LoginRequest, RegisterRequest},
};

const USERNAME_LENGTH: usize = 150;
const PASSWORD_MIN_LENGTH: usize = 8;

fn check_registration(request: &RegisterRequest) -> Result<(), Error> {
    let mut errors = FieldErrors::new();
    let mut fail = |field: &str, message: &str| {
        errors
            .entry(field.to_owned())
            .or_default()
            .push(message.to_owned());
    };

    let username = request.username.trim();
    if username.is_empty() {
        fail("username", "This field may not be blank.");
    } else if username.chars().count() > USERNAME_LENGTH {
        fail("username", "Ensure this field has no more than 150 characters.");
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        fail(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    let email = request.email.trim();
    if email.is_empty() {
        fail("email", "This field may not be blank.");
    } else if !email.contains('@') {
        fail("email", "Enter a valid email address.");
    }

    if request.password1.chars().count() < PASSWORD_MIN_LENGTH {
        fail(
            "password1",
            "This password is too short. It must contain at least 8 characters.",
        );
    }
    if request.password1 != request.password2 {
        fail("non_field_errors", "The two password fields didn't match.");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

async fn hash_password(password: String) -> Result<String, Error> {
    let hashed = tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await??;
    Ok(hashed)
}

/// Inserts the user along with its profile and default pricing table.
async fn create_account(state: &State, user: NewUser) -> Result<User, Error> {
    let mut tx = state.database.pool.begin().await?;

    let user = state.database.user.insert(&user, &mut tx).await?;
    state
        .database
        .user_profile
        .insert_default(user.id, &mut tx)
        .await?;
    state
        .database
        .pricing_settings
        .insert_default(user.id, &mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Created account {} ({})", user.id, user.username);

    Ok(user)
}

/// Gives an account created before profiles existed its missing rows.
async fn ensure_account_rows(state: &State, user_id: i64) -> Result<(), Error> {
    let mut tx = state.database.pool.begin().await?;

    state
        .database
        .user_profile
        .insert_default(user_id, &mut tx)
        .await?;
    state
        .database
        .pricing_settings
        .insert_default(user_id, &mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

pub async fn register(state: &State, request: RegisterRequest) -> Result<User, Error> {
    check_registration(&request)?;

    let username = request.username.trim().to_owned();
    let email = request.email.trim().to_owned();

    if state.database.user.get_by_email(&email).await?.is_some() {
        return Err(Error::field(
            "email",
            "A user is already registered with this e-mail address.",
        ));
    }

    let password_hash = hash_password(request.password1).await?;
    let user = NewUser {
        username,
        email,
        first_name: String::new(),
        last_name: String::new(),
        password_hash: Some(password_hash),
    };

    create_account(state, user).await.map_err(|e| {
        if e.is_unique_violation() {
            Error::field("username", "A user with that username already exists.")
        } else {
            e
        }
    })
}

pub async fn login(state: &State, request: LoginRequest) -> Result<User, Error> {
    let login = request.login().ok_or(Error::InvalidCredentials)?;
    let user = state
        .database
        .user
        .get_by_login(login.trim())
        .await?
        .ok_or(Error::InvalidCredentials)?;

    let password_hash = user
        .password_hash
        .clone()
        .ok_or(Error::InvalidCredentials)?;
    let password = request.password;

    let valid = tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await??;

    if !valid {
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Finds the account for a verified provider identity, creating it on
/// first login.
pub async fn login_with_google(
    state: &State,
    identity: GoogleIdentity,
) -> Result<User, Error> {
    if let Some(user) = state.database.user.get_by_email(&identity.email).await? {
        ensure_account_rows(state, user.id).await?;
        return Ok(user);
    }

    let user = NewUser {
        username: identity.email.clone(),
        email: identity.email,
        first_name: identity.first_name,
        last_name: identity.last_name,
        password_hash: None,
    };

    create_account(state, user).await.map_err(|e| {
        if e.is_unique_violation() {
            Error::Conflict(String::from("A user with that username already exists."))
        } else {
            e
        }
    })
}

pub async fn current_user(state: &State, user_id: i64) -> Result<User, Error> {
    state
        .database
        .user
        .get_one(user_id)
        .await?
        .ok_or_else(|| Error::Unauthorized(String::from("User not found")))
}
