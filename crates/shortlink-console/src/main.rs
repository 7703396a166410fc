//! # shortlink
//!
//! Command-line admin console for the short-link service. The session is
//! kept on disk between runs, so `shortlink login` once and the other
//! commands reuse it until it expires or `shortlink logout` is run.

mod cli;
mod output;

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde_json::json;
use shortlink_client::ShortLinkClient;
use shortlink_common::models::{
    BatchCreateShortLinkReq, CreateShortLinkReq, PageShortLinkReq, RecycleBinOperateReq,
    RecycleBinPageReq, ShortLinkAccessRecordReq, ShortLinkGroupAccessRecordReq,
    ShortLinkGroupSortReq, ShortLinkGroupStatsReq, ShortLinkGroupUpdateReq, ShortLinkStatsReq,
    UpdateShortLinkReq, UserRegisterReq, UserUpdateReq, VALID_DATE_CUSTOM, VALID_DATE_PERMANENT,
};
use shortlink_common::ViewMode;

use cli::{
    Cli, Command, DateRange, GroupCommand, LinkCommand, LinkRef, ProfileCommand, RecycleCommand,
    StatsCommand, ValidityArgs,
};
use output::{print_json, ConsoleNavigator, ConsoleNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only command results.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shortlink=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = shortlink_common::config::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let navigator = Arc::new(ConsoleNavigator::default());
    let client = ShortLinkClient::new(&config, Arc::new(ConsoleNotifier), navigator.clone())?;

    let result = run(cli.command, &client).await;
    if navigator.redirected() {
        tracing::debug!("Session ended during this command");
    }
    result
}

async fn run(command: Command, client: &ShortLinkClient) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let session = client.login(&username, &password).await?;
            print_json(&json!({ "username": session.username, "realname": session.realname }))
        }
        Command::Logout => {
            client.logout().await;
            Ok(())
        }
        Command::Whoami => {
            let s = client.session().snapshot();
            print_json(&json!({
                "authenticated": s.is_authenticated(),
                "username": s.username,
                "realname": s.realname,
                "viewMode": s.view_mode,
            }))
        }
        Command::Check => {
            let valid = client.check_session().await;
            print_json(&json!({ "valid": valid }))?;
            if !valid {
                bail!("session is not valid");
            }
            Ok(())
        }
        Command::Register(args) => {
            let req = UserRegisterReq {
                username: args.username,
                password: args.password,
                realname: args.realname,
                phone: args.phone,
                mail: args.mail,
            };
            client.users().register(&req).await?;
            print_json(&json!({ "registered": req.username }))
        }
        Command::Profile { command } => profile(command, client).await,
        Command::View { mode: Some(mode) } => {
            client.set_view_mode(mode)?;
            print_json(&json!({ "viewMode": mode }))
        }
        Command::View { mode: None } => print_json(&json!({ "viewMode": client.session().view_mode() })),
        Command::Groups { command } => groups(command, client).await,
        Command::Links { command } => links(command, client).await,
        Command::Recycle { command } => recycle(command, client).await,
        Command::Stats { command } => stats(command, client).await,
        Command::Locate { ip, direct } => {
            let location = if direct {
                client.geo()?.locate(ip.as_deref()).await?
            } else {
                let ip = ip.context("an IP address is required unless --direct is given")?;
                client.location().lookup(&ip).await?
            };
            if !location.is_ok() {
                tracing::warn!(info = %location.info, "Provider could not locate address");
            }
            print_json(&location)
        }
    }
}

fn signed_in_user(client: &ShortLinkClient) -> anyhow::Result<String> {
    match client.session().credentials() {
        Some(creds) => Ok(creds.username),
        None => bail!("not logged in; run `shortlink login` first"),
    }
}

async fn profile(command: ProfileCommand, client: &ShortLinkClient) -> anyhow::Result<()> {
    match command {
        ProfileCommand::Show { actual: false } => print_json(&client.refresh_profile().await?),
        ProfileCommand::Show { actual: true } => {
            let username = signed_in_user(client)?;
            print_json(&client.users().actual_user_info(&username).await?)
        }
        ProfileCommand::Update { realname, phone, mail, password } => {
            let req = UserUpdateReq {
                username: signed_in_user(client)?,
                password,
                real_name: realname,
                phone,
                mail,
            };
            client.update_profile(&req).await?;
            print_json(&client.refresh_profile().await?)
        }
    }
}

async fn groups(command: GroupCommand, client: &ShortLinkClient) -> anyhow::Result<()> {
    let api = client.groups();
    match command {
        GroupCommand::List => print_json(&api.list().await?),
        GroupCommand::Create { name } => {
            api.create(&name).await?;
            print_json(&json!({ "created": name }))
        }
        GroupCommand::Rename { gid, name } => {
            api.update(&ShortLinkGroupUpdateReq { gid, name }).await?;
            print_json(&api.list().await?)
        }
        GroupCommand::Delete { gid } => {
            api.delete(&gid).await?;
            print_json(&json!({ "deleted": gid }))
        }
        GroupCommand::Sort { gids } => {
            api.sort(&ShortLinkGroupSortReq::from_order(gids)).await?;
            print_json(&api.list().await?)
        }
    }
}

/// `(validDateType, validDate)` for the given expiry.
fn validity(args: &ValidityArgs) -> (i32, Option<String>) {
    match &args.valid_until {
        Some(until) => (VALID_DATE_CUSTOM, Some(until.clone())),
        None => (VALID_DATE_PERMANENT, None),
    }
}

async fn links(command: LinkCommand, client: &ShortLinkClient) -> anyhow::Result<()> {
    let api = client.links();
    match command {
        LinkCommand::List { gid, page } => match client.session().view_mode() {
            ViewMode::Normal => {
                let req = PageShortLinkReq { gid, current: page.page, size: page.size };
                print_json(&api.page(&req).await?)
            }
            ViewMode::Recycle => {
                let req = RecycleBinPageReq {
                    gid: Some(gid),
                    current: Some(page.page),
                    size: Some(page.size),
                };
                print_json(&client.recycle_bin().page(&req).await?)
            }
        },
        LinkCommand::Create { gid, url, validity: v } => {
            let (valid_date_type, valid_date) = validity(&v);
            let req = CreateShortLinkReq {
                origin_url: url,
                gid,
                valid_date_type: Some(valid_date_type),
                valid_date,
                describe: v.describe,
            };
            print_json(&api.create(&req).await?)
        }
        LinkCommand::Batch { gid, urls, validity: v } => {
            let (valid_date_type, valid_date) = validity(&v);
            let req = BatchCreateShortLinkReq {
                valid_date_type: Some(valid_date_type),
                valid_date,
                describe: v.describe,
                ..BatchCreateShortLinkReq::new(gid, &urls)
            };
            print_json(&api.batch_create(&req).await?)
        }
        LinkCommand::Update { gid, full_short_url, url, validity: v } => {
            let (valid_date_type, valid_date) = validity(&v);
            let req = UpdateShortLinkReq {
                full_short_url,
                origin_url: url,
                gid,
                valid_date_type,
                valid_date,
                describe: v.describe,
            };
            api.update(&req).await?;
            print_json(&json!({ "updated": req.full_short_url }))
        }
        LinkCommand::Title { url } => print_json(&json!({ "title": api.url_title(&url).await? })),
    }
}

async fn recycle(command: RecycleCommand, client: &ShortLinkClient) -> anyhow::Result<()> {
    let api = client.recycle_bin();
    let operate = |link: LinkRef| RecycleBinOperateReq { gid: link.gid, full_short_url: link.full_short_url };
    match command {
        RecycleCommand::List { gid, page } => {
            let req = RecycleBinPageReq { gid, current: Some(page.page), size: Some(page.size) };
            print_json(&api.page(&req).await?)
        }
        RecycleCommand::Save(link) => {
            let req = operate(link);
            api.save(&req).await?;
            print_json(&json!({ "recycled": req.full_short_url }))
        }
        RecycleCommand::Recover(link) => {
            let req = operate(link);
            api.recover(&req).await?;
            print_json(&json!({ "recovered": req.full_short_url }))
        }
        RecycleCommand::Remove(link) => {
            let req = operate(link);
            api.remove(&req).await?;
            print_json(&json!({ "removed": req.full_short_url }))
        }
    }
}

/// Resolve `--from`/`--to`: today when both are absent, a single day when only `--from` is.
fn date_range(range: DateRange) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let from = range.from.unwrap_or_else(|| Utc::now().date_naive());
    let to = range.to.unwrap_or(from);
    if to < from {
        bail!("--to ({to}) is before --from ({from})");
    }
    Ok((from, to))
}

async fn stats(command: StatsCommand, client: &ShortLinkClient) -> anyhow::Result<()> {
    let api = client.stats();
    match command {
        StatsCommand::Link { link, range } => {
            let (from, to) = date_range(range)?;
            let req = ShortLinkStatsReq::between(link.full_short_url, link.gid, from, to);
            print_json(&api.link(&req).await?)
        }
        StatsCommand::Group { gid, range } => {
            let (from, to) = date_range(range)?;
            print_json(&api.group(&ShortLinkGroupStatsReq::between(gid, from, to)).await?)
        }
        StatsCommand::Access { link, range, page } => {
            let (from, to) = date_range(range)?;
            let stats = ShortLinkStatsReq::between(link.full_short_url, link.gid, from, to);
            let req = ShortLinkAccessRecordReq::from_stats(&stats, page.page, page.size);
            print_json(&api.access_records(&req).await?)
        }
        StatsCommand::GroupAccess { gid, range, page } => {
            let (from, to) = date_range(range)?;
            let stats = ShortLinkGroupStatsReq::between(gid, from, to);
            let req = ShortLinkGroupAccessRecordReq::from_stats(&stats, page.page, page.size);
            print_json(&api.group_access_records(&req).await?)
        }
    }
}
