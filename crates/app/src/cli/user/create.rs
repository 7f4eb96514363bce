use clap::Args;
use gbms_app::{
    database,
    domain::users::{
        PgUsersService,
        data::NewUser,
        records::Role,
    },
};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

const GENERATED_PASSWORD_LEN: usize = 16;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login identifier
    #[arg(long)]
    user_id: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Department the user belongs to
    #[arg(long)]
    department: String,

    /// Access level: admin, manager or user
    #[arg(long, default_value = "user")]
    role: Role,

    /// Optional email address
    #[arg(long)]
    email: Option<String>,

    /// Optional password; a random one is generated when omitted
    #[arg(long, env = "GBMS_USER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let generated = args.password.is_none();
    let password = args.password.unwrap_or_else(generate_password);

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(pool)
        .create_initial_user(NewUser {
            user_id: args.user_id,
            password: password.clone(),
            name: args.name,
            department: args.department,
            email: args.email,
            role: args.role,
            phone: None,
            position: None,
            is_active: true,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_id: {}", user.user_id);
    println!("role: {}", user.role);

    if generated {
        println!("password: {password}");
        println!("store this password now; it is only shown once");
    }

    Ok(())
}

fn generate_password() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
