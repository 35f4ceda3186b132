use std::io::{self, Write};

use diesel::{Connection, sqlite::SqliteConnection};
use dotenvy::dotenv;
use rpassword::read_password;

pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let conn = SqliteConnection::establish(&database_url)?;
    Ok(conn)
}

/// Prompts for a password twice on the terminal, echoing nothing.
pub fn prompt_for_password() -> Result<String, Box<dyn std::error::Error>> {
    print!("Password: ");
    io::stdout().flush()?;
    let password = read_password()?;

    print!("Confirm password: ");
    io::stdout().flush()?;
    let confirmation = read_password()?;

    if password != confirmation {
        return Err("Passwords do not match".into());
    }
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    Ok(password)
}

/// Asks for a y/N confirmation on stdin.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
