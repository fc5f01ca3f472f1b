//! Session and roster commands.

use crate::cli::UserAction;
use crate::commands::parse;
use crate::context::AppContext;

pub fn login(email: &str, ctx: &mut AppContext) -> anyhow::Result<()> {
    let user = ctx.directory.login(email)?;
    println!("signed in as {} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> anyhow::Result<()> {
    ctx.directory.logout()?;
    println!("signed out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    match ctx.directory.current_user()? {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("nobody is signed in"),
    }
    Ok(())
}

pub fn users(action: UserAction, ctx: &mut AppContext) -> anyhow::Result<()> {
    match action {
        UserAction::Add {
            name,
            email,
            role,
            admin,
        } => {
            let role = parse::role(&role)?;
            let user = ctx.directory.create_user(&name, &email, role, admin)?;
            println!("registered {} <{}> ({})", user.name, user.email, user.role);
        }
        UserAction::List => {
            if ctx.directory.users().is_empty() {
                println!("no users registered");
            }
            for user in ctx.directory.users() {
                let admin = if user.is_system_admin() { "  [admin]" } else { "" };
                println!("{} <{}> ({}){admin}", user.name, user.email, user.role);
            }
        }
        UserAction::Rm { email } => {
            if ctx.directory.delete_user(&email)? {
                println!("removed {email}");
            } else {
                println!("no user {email}");
            }
        }
        UserAction::Log { limit } => {
            for entry in ctx.directory.events(limit)? {
                let detail = entry
                    .detail
                    .map_or(String::new(), |d| format!("  ({d})"));
                println!(
                    "{}  {:<16}  {}{detail}",
                    entry.occurred_at.to_rfc3339(),
                    entry.event.as_str(),
                    entry.actor
                );
            }
        }
    }
    Ok(())
}
