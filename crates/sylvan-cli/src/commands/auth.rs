//! Account and session commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use sylvan_core::customer::{NewCustomer, ProfileUpdate};
use sylvan_core::{ApiUrl, Credentials, Customer, Email};
use sylvan_http::{HttpSession, HttpStorefront};

use crate::output;
use crate::session::{self, storage};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign in with email and password
    Login(LoginArgs),

    /// Sign out and forget the local session and cart
    Logout,

    /// Display the signed-in customer
    Whoami(WhoamiArgs),

    /// Refresh the session tokens
    Refresh,

    /// Link an OAuth provider using an authorization code
    Link(LinkArgs),

    /// Update profile fields
    UpdateProfile(UpdateProfileArgs),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Provider name, e.g. google
    #[arg(long)]
    pub provider: String,

    /// Authorization code returned by the provider
    #[arg(long)]
    pub code: String,

    /// Redirect URI the code was issued for
    #[arg(long)]
    pub redirect_uri: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}

pub async fn handle(cmd: AuthCommand, api: ApiUrl) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Register(args) => register(args, api).await,
        AuthSubcommand::Login(args) => login(args, api).await,
        AuthSubcommand::Logout => logout().await,
        AuthSubcommand::Whoami(args) => whoami(args).await,
        AuthSubcommand::Refresh => refresh().await,
        AuthSubcommand::Link(args) => link(args).await,
        AuthSubcommand::UpdateProfile(args) => update_profile(args).await,
    }
}

async fn register(args: RegisterArgs, api: ApiUrl) -> Result<()> {
    let email = Email::new(&args.email).context("Invalid email")?;
    let form = NewCustomer::new(args.first_name, args.last_name, email, args.password);

    let storefront = HttpStorefront::new(api).context("Failed to create HTTP client")?;
    let session = storefront
        .register(&form)
        .await
        .context("Failed to register")?;

    session::persist(&session)
        .await
        .context("Failed to save session")?;

    output::success("Account created");
    println!();
    print_customer(&session.customer().await?);
    Ok(())
}

async fn login(args: LoginArgs, api: ApiUrl) -> Result<()> {
    let email = Email::new(&args.email).context("Invalid email")?;
    let credentials = Credentials::new(email, args.password);

    eprintln!("{}", "Signing in...".dimmed());

    let storefront = HttpStorefront::new(api).context("Failed to create HTTP client")?;
    let session = storefront
        .login(credentials)
        .await
        .context("Failed to login")?;

    session::persist(&session)
        .await
        .context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    print_customer(&session.customer().await?);
    Ok(())
}

async fn logout() -> Result<()> {
    let Some(session) = storage::load_session().context("Failed to load session")? else {
        output::note("Not signed in.");
        return Ok(());
    };

    let revoked = session.logout().await;

    storage::clear_session()?;
    storage::save_cart(&Default::default())?;

    if let Err(e) = revoked {
        tracing::warn!(error = %e, "backend logout failed, local session removed anyway");
    }
    output::success("Logged out");
    Ok(())
}

async fn whoami(args: WhoamiArgs) -> Result<()> {
    let session = session::require()?;
    let customer = session::persisting(&session, async {
        session.profile().await.context("Failed to fetch profile")
    })
    .await?;

    if args.json {
        return output::json_pretty(&customer);
    }
    print_customer(&customer);
    output::field("API", session.storefront().api().as_str());
    Ok(())
}

async fn refresh() -> Result<()> {
    let session = session::require()?;
    session::persisting(&session, async {
        session.refresh().await.context("Failed to refresh session")
    })
    .await?;

    output::success("Session refreshed");
    Ok(())
}

async fn link(args: LinkArgs) -> Result<()> {
    let session = session::require()?;
    let customer = session::persisting(&session, async {
        session
            .link_oauth(&args.provider, &args.code, args.redirect_uri.as_deref())
            .await
            .with_context(|| format!("Failed to link {}", args.provider))
    })
    .await?;

    output::success(&format!("Linked {}", args.provider));
    output::field("Providers", &customer.linked_providers.join(", "));
    Ok(())
}

async fn update_profile(args: UpdateProfileArgs) -> Result<()> {
    let update = ProfileUpdate {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args
            .email
            .map(Email::new)
            .transpose()
            .context("Invalid email")?,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass --first-name, --last-name or --email.");
    }

    let session: HttpSession = session::require()?;
    let customer = session::persisting(&session, async {
        session
            .update_profile(&update)
            .await
            .context("Failed to update profile")
    })
    .await?;

    output::success("Profile updated");
    print_customer(&customer);
    Ok(())
}

fn print_customer(customer: &Customer) {
    output::field("Name", &customer.display_name());
    output::field("Email", &customer.email);
    output::field("ID", &customer.id.to_string());
    if customer.is_admin {
        output::field("Role", "admin");
    }
    if !customer.linked_providers.is_empty() {
        output::field("Linked", &customer.linked_providers.join(", "));
    }
}
