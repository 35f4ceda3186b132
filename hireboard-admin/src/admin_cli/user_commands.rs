use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use regex::Regex;

use hireboard_api::models::{User, UserInput};
use hireboard_api::orm::login::hash_password;
use hireboard_api::orm::user::{
    delete_user, get_user_by_email, insert_user, list_all_users, set_password_hash,
};

use crate::admin_cli::utils::{confirm, prompt_for_password};

#[derive(Subcommand)]
pub enum UserAction {
    #[command(about = "Add a new user")]
    Add {
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(short, long, help = "Password (will be prompted securely if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Grant the staff flag")]
        staff: bool,
    },
    #[command(about = "Change user password")]
    ChangePassword {
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(short, long, help = "New password (will be prompted securely if not provided)")]
        password: Option<String>,
    },
    #[command(about = "List users, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
    },
    #[command(about = "Remove users matching search term")]
    Rm {
        #[arg(help = "Search term to match users for removal (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_user_command(
    conn: &mut SqliteConnection,
    action: UserAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Add {
            email,
            password,
            staff,
        } => add_user_impl(conn, &email, password, staff),
        UserAction::ChangePassword { email, password } => {
            change_password_impl(conn, &email, password)
        }
        UserAction::Ls {
            search_term,
            fixed_string,
        } => list_users_impl(conn, search_term, fixed_string),
        UserAction::Rm {
            search_term,
            fixed_string,
            yes,
        } => remove_users_impl(conn, &search_term, fixed_string, yes),
    }
}

pub fn add_user_impl(
    conn: &mut SqliteConnection,
    email: &str,
    password: Option<String>,
    staff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = email.trim().to_lowercase();
    if get_user_by_email(conn, &email)?.is_some() {
        return Err(format!("User '{}' already exists", email).into());
    }

    let password = match password {
        Some(p) => p,
        None => prompt_for_password()?,
    };

    let created = insert_user(
        conn,
        UserInput {
            email,
            password_hash: hash_password(&password),
            is_staff: staff,
        },
    )?;

    println!("User created successfully!");
    println!("ID: {}", created.id);
    println!("Email: {}", created.email);
    println!("Staff: {}", created.is_staff);

    Ok(())
}

pub fn change_password_impl(
    conn: &mut SqliteConnection,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = email.trim().to_lowercase();
    let user = get_user_by_email(conn, &email)?
        .ok_or_else(|| format!("No user with email '{}'", email))?;

    let password = match password {
        Some(p) => p,
        None => prompt_for_password()?,
    };

    set_password_hash(conn, user.id, &hash_password(&password))?;
    println!("Password changed successfully for user: {}", email);
    Ok(())
}

/// Narrows a user list by regex or fixed-string match on the email.
fn filter_users(
    users: Vec<User>,
    search_term: Option<&str>,
    fixed_string: bool,
) -> Result<Vec<User>, Box<dyn std::error::Error>> {
    let Some(term) = search_term else {
        return Ok(users);
    };

    if fixed_string {
        Ok(users
            .into_iter()
            .filter(|user| user.email.contains(term))
            .collect())
    } else {
        let regex = Regex::new(term)
            .map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
        Ok(users
            .into_iter()
            .filter(|user| regex.is_match(&user.email))
            .collect())
    }
}

pub fn list_users_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = list_all_users(conn)?;
    let filtered = filter_users(users, search_term.as_deref(), fixed_string)?;

    if filtered.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("Users:");
    for user in filtered {
        let mut flags = Vec::new();
        if user.is_staff {
            flags.push("staff");
        }
        if !user.is_active {
            flags.push("inactive");
        }
        let suffix = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!("  {} {}{}", user.id, user.email, suffix);
    }
    Ok(())
}

pub fn remove_users_impl(
    conn: &mut SqliteConnection,
    search_term: &str,
    fixed_string: bool,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = list_all_users(conn)?;
    let matched = filter_users(users, Some(search_term), fixed_string)?;

    if matched.is_empty() {
        println!("No users match '{}'.", search_term);
        return Ok(());
    }

    println!("Matched users:");
    for user in &matched {
        println!("  {} {}", user.id, user.email);
    }

    if !yes && !confirm(&format!("Remove {} user(s)?", matched.len()))? {
        println!("Aborted.");
        return Ok(());
    }

    for user in matched {
        delete_user(conn, user.id)?;
        println!("Removed {}", user.email);
    }
    Ok(())
}
