use clap::Args;
use leadbook_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{Role, UserUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    full_name: String,

    /// Sign-in email, unique ignoring case
    #[arg(long)]
    email: String,

    /// Sign-in password
    #[arg(long, env = "LEADBOOK_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// `admin` or `salesperson`
    #[arg(long, default_value = "salesperson")]
    role: Role,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let result = PgUsersService::new(db.clone())
        .create_user(NewUser {
            uuid: UserUuid::new(),
            full_name: args.full_name,
            email: args.email,
            password: args.password,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"));

    db.close().await;

    let user = result?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);

    Ok(())
}
