use clap::Args;
use leadbook_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{Role, UserUuid},
};

const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: [(&str, &str, Role); 2] = [
    ("Admin User", "admin@example.com", Role::Admin),
    ("Sales Person", "sales@example.com", Role::Salesperson),
];

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

/// Create the demo admin and salesperson unless they already exist.
pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgUsersService::new(db.clone());

    let mut result = Ok(());

    for (full_name, email, role) in DEMO_USERS {
        let created = service
            .create_user_if_absent(NewUser {
                uuid: UserUuid::new(),
                full_name: full_name.to_owned(),
                email: email.to_owned(),
                password: DEMO_PASSWORD.to_owned(),
                role,
            })
            .await;

        match created {
            Ok(Some(user)) => println!("created {} ({})", user.email, user.role),
            Ok(None) => println!("skipped {email}: already exists"),
            Err(error) => {
                result = Err(format!("failed to seed {email}: {error}"));
                break;
            }
        }
    }

    db.close().await;

    result
}
