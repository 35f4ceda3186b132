use chrono::Utc;
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use hireboard_api::orm::job_advert::list_all_adverts;
use hireboard_api::orm::user::get_user_by_email;

#[derive(Subcommand)]
pub enum AdvertAction {
    #[command(about = "List adverts with owner and active state")]
    Ls {
        #[arg(long, help = "Only adverts owned by this email address")]
        owner: Option<String>,
    },
}

pub fn handle_advert_command(
    conn: &mut SqliteConnection,
    action: AdvertAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AdvertAction::Ls { owner } => list_adverts_impl(conn, owner),
    }
}

pub fn list_adverts_impl(
    conn: &mut SqliteConnection,
    owner: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let owner_id = match owner {
        Some(email) => {
            let email = email.trim().to_lowercase();
            let user = get_user_by_email(conn, &email)?
                .ok_or_else(|| format!("No user with email '{}'", email))?;
            Some(user.id)
        }
        None => None,
    };

    let now = Utc::now().naive_utc();
    let adverts = list_all_adverts(conn)?
        .into_iter()
        .filter(|advert| owner_id.is_none_or(|id| advert.created_by == id))
        .collect::<Vec<_>>();

    if adverts.is_empty() {
        println!("No adverts found.");
        return Ok(());
    }

    println!("Adverts:");
    for advert in adverts {
        let state = if advert.is_active_at(now) {
            "active"
        } else if advert.is_published {
            "expired"
        } else {
            "draft"
        };
        println!(
            "  {} [{}] {} at {} (deadline {})",
            advert.id, state, advert.title, advert.company_name, advert.deadline
        );
    }
    Ok(())
}
