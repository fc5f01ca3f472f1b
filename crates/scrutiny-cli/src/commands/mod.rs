//! Command handlers.

mod audits;
mod auth;
mod parse;

use crate::cli::Commands;
use crate::context::AppContext;

pub async fn dispatch(command: Commands, ctx: &mut AppContext) -> anyhow::Result<()> {
    match command {
        Commands::Create(args) => audits::create(args, ctx).await,
        Commands::List(args) => audits::list(&args, ctx),
        Commands::Show { id } => audits::show(&id, ctx),
        Commands::Edit(args) => audits::edit(args, ctx).await,
        Commands::Status(args) => audits::status(args, ctx).await,
        Commands::Delete { id } => audits::delete(&id, ctx).await,
        Commands::Restore { id } => audits::restore(&id, ctx).await,
        Commands::History { id } => audits::history(&id, ctx),
        Commands::Email(args) => audits::email(&args, ctx),
        Commands::Login { email } => auth::login(&email, ctx),
        Commands::Logout => auth::logout(ctx),
        Commands::Whoami => auth::whoami(ctx),
        Commands::Users { action } => auth::users(action, ctx),
    }
}
