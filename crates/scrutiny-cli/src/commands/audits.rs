//! Audit lifecycle commands.

use anyhow::{Context as _, bail};

use scrutiny_core::email::coordination_email;
use scrutiny_core::entities::Audit;
use scrutiny_store::service::{AuditDraft, AuditEdit, AuditView};

use crate::cli::{CreateArgs, EditArgs, EmailArgs, ListArgs, StatusArgs};
use crate::commands::parse;
use crate::context::AppContext;

pub async fn create(args: CreateArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    let actor = ctx.current_user()?;

    let contacts = args
        .contacts
        .iter()
        .map(|raw| parse::contact(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let planned_meeting_at = args
        .meeting
        .as_deref()
        .map(parse::meeting)
        .transpose()?
        .flatten();

    let draft = AuditDraft {
        name: args.name,
        description: args.description,
        client_name: args.client,
        contacts,
        planned_meeting_at,
        scheduled_at: None,
    };
    let audit = ctx.manager.create(draft, Some(&actor)).await?;
    println!("created {} ({})", audit.id, audit.name);
    Ok(())
}

pub fn list(args: &ListArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let view = if args.archive {
        AuditView::Archive
    } else if args.all {
        AuditView::All
    } else {
        AuditView::Active
    };
    let owner = if args.mine {
        Some(ctx.current_user()?.email)
    } else {
        None
    };

    let audits = ctx.manager.view(view, owner.as_deref());
    if audits.is_empty() {
        println!("no audits");
        return Ok(());
    }
    for audit in audits {
        println!(
            "{}  {:<28}  {}  ({}, {})",
            audit.id,
            audit.status.as_str(),
            audit.name,
            audit.client_name,
            audit.owner_name
        );
    }
    Ok(())
}

pub fn show(id: &str, ctx: &AppContext) -> anyhow::Result<()> {
    let audit = find(ctx, id)?;
    println!("{}  {}", audit.id, audit.name);
    println!("  client:    {}", audit.client_name);
    println!("  owner:     {} <{}>", audit.owner_name, audit.owner_id);
    println!("  status:    {}", audit.status);
    println!("  received:  {}", audit.received_at.to_rfc3339());
    if let Some(at) = audit.planned_meeting_at {
        println!("  meeting:   {}", at.to_rfc3339());
    }
    if let Some(at) = audit.scheduled_at {
        println!("  scheduled: {}", at.to_rfc3339());
    }
    if !audit.description.is_empty() {
        println!("  notes:     {}", audit.description);
    }
    println!("  contacts:");
    for contact in &audit.contacts {
        let email = if contact.email.is_empty() {
            String::new()
        } else {
            format!(" <{}>", contact.email)
        };
        println!("    {}  {}{}", contact.id, contact.full_name(), email);
    }
    println!("  log entries: {}", audit.status_log.len());
    Ok(())
}

pub async fn edit(args: EditArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    let actor = ctx.current_user()?;

    let mut edit = AuditEdit {
        name: args.name,
        description: args.description,
        client_name: args.client,
        ..Default::default()
    };
    if let Some(raw) = args.status.as_deref() {
        edit.status = Some(parse::status(raw)?);
    }
    if let Some(raw) = args.meeting.as_deref() {
        edit.planned_meeting_at = Some(parse::meeting(raw)?);
    }
    edit.reason = args.reason;

    let audit = ctx.manager.edit(&args.id, edit, Some(&actor)).await?;
    println!("updated {} (status {})", audit.id, audit.status);
    Ok(())
}

pub async fn status(args: StatusArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    let actor = ctx.current_user()?;
    let target = parse::status(&args.status)?;
    ctx.manager
        .change_status(&args.id, target, args.reason.as_deref(), Some(&actor))
        .await?;
    println!("{} -> {target}", args.id);
    Ok(())
}

pub async fn delete(id: &str, ctx: &mut AppContext) -> anyhow::Result<()> {
    let actor = ctx.current_user()?;
    if ctx.manager.delete(id, Some(&actor)).await? {
        println!("deleted {id}");
    } else {
        println!("no audit {id}");
    }
    Ok(())
}

pub async fn restore(id: &str, ctx: &mut AppContext) -> anyhow::Result<()> {
    let actor = ctx.current_user()?;
    let audit = ctx.manager.restore_from_archive(id, Some(&actor)).await?;
    println!("restored {} (status {})", audit.id, audit.status);
    Ok(())
}

pub fn history(id: &str, ctx: &AppContext) -> anyhow::Result<()> {
    let audit = find(ctx, id)?;
    for entry in &audit.status_log {
        let change = match (entry.old_status, entry.new_status) {
            (_, Some(new)) => format!(
                "{} -> {new}",
                entry.old_status.map_or("(new)".to_string(), |s| s.to_string())
            ),
            (_, None) => format!(
                "meeting {} -> {}",
                entry
                    .old_date
                    .map_or("(none)".to_string(), |d| d.to_rfc3339()),
                entry
                    .new_date
                    .map_or("(none)".to_string(), |d| d.to_rfc3339()),
            ),
        };
        println!(
            "{}  {:<40}  {}  [{}]",
            entry.changed_at.to_rfc3339(),
            change,
            entry.changed_by,
            entry.reason
        );
    }
    Ok(())
}

pub fn email(args: &EmailArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let audit = find(ctx, &args.id)?;
    let contact = match args.contact.as_deref() {
        Some(wanted) => audit
            .contacts
            .iter()
            .find(|c| c.id == wanted || c.first_name.eq_ignore_ascii_case(wanted))
            .with_context(|| format!("audit {} has no contact '{wanted}'", audit.id))?,
        None => audit
            .contacts
            .first()
            .with_context(|| format!("audit {} has no contacts", audit.id))?,
    };

    let draft = coordination_email(audit, contact);
    println!("Subject: {}", draft.subject);
    println!();
    println!("{}", draft.body);
    Ok(())
}

fn find<'a>(ctx: &'a AppContext, id: &str) -> anyhow::Result<&'a Audit> {
    match ctx.manager.get(id) {
        Some(audit) => Ok(audit),
        None => bail!("no audit {id}"),
    }
}
