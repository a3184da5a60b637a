use std::path::Path;
use std::time::{Duration, Instant};

use crate::api::{Endpoints, HttpClient, Method, PostApi, build_options};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::dom::{Document, UPDATE_ID_ATTR, render_post};
use crate::edit::modal::{SUBMIT_ID, field_id};
use crate::edit::{Field, Notice, UpdateWorkflow};
use crate::io::config_io::read_config;
use crate::io::local_storage::LocalStorage;
use crate::model::{AppConfig, CurrentUser, Post, PostId};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        None => Err("no command given (run `pe` without arguments for the TUI)".into()),
        // Local only, no backend needed
        Some(Commands::User(args)) => cmd_user(data_dir, args, json),
        Some(Commands::List) => cmd_list(&Backend::load(data_dir)?, json),
        Some(Commands::Edit(args)) => cmd_edit(&Backend::load(data_dir)?, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Everything a command needs to talk to the backend
pub struct Backend {
    pub config: AppConfig,
    pub endpoints: Endpoints,
    pub api: Box<dyn PostApi>,
}

impl Backend {
    fn load(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = read_config(data_dir)?;
        let user = LocalStorage::open(data_dir)?.current_user();
        let endpoints = Endpoints::for_user(&config.api.base_url, &user);
        let api = HttpClient::new(Duration::from_secs(config.api.timeout_secs))?;
        Ok(Backend {
            config,
            endpoints,
            api: Box::new(api),
        })
    }

    fn fetch_posts(&self) -> Result<Vec<Post>, Box<dyn std::error::Error>> {
        let options = build_options(Method::Get, None, &self.endpoints)?;
        Ok(self.api.fetch_all(&self.endpoints.posts_url(), &options)?)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(backend: &Backend, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let posts = backend.fetch_posts()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        for post in &posts {
            println!("{}", format_post_line(post));
        }
    }
    Ok(())
}

fn cmd_edit(backend: &Backend, args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = PostId::new(args.id.clone());
    let posts = backend.fetch_posts()?;
    let post = posts
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| format!("post not found: {}", id))?;

    let (notice, updated) = edit_headless(backend, post, &args);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&edit_result_json(&notice, updated.as_ref()))?
        );
    }
    match notice {
        Notice::Success(message) => {
            if !json {
                println!("{}", message);
                if let Some(post) = &updated {
                    for line in format_post_detail(post) {
                        println!("{}", line);
                    }
                }
            }
            Ok(())
        }
        Notice::Error(message) => Err(message.into()),
    }
}

fn cmd_user(data_dir: &Path, args: UserArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = LocalStorage::open(data_dir)?;
    let user = apply_user_args(storage.current_user(), args);
    if let Some(user) = &user {
        storage.set_current_user(user)?;
        storage.save()?;
        tracing::info!(name = %user.name, "current user updated");
    }
    let user = user.unwrap_or_else(|| storage.current_user());

    if json {
        println!("{}", serde_json::to_string_pretty(&user_to_json(&user))?);
    } else {
        for line in format_user(&user) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// The user after applying `args`, or `None` when nothing was asked to
/// change. Empty option values clear the field.
pub fn apply_user_args(mut user: CurrentUser, args: UserArgs) -> Option<CurrentUser> {
    if args.name.is_none() && args.token.is_none() && args.api_base.is_none() {
        return None;
    }
    if let Some(name) = args.name {
        user.name = name;
    }
    if let Some(token) = args.token {
        user.access_token = Some(token).filter(|t| !t.is_empty());
    }
    if let Some(base) = args.api_base {
        user.api_base = Some(base).filter(|b| !b.is_empty());
    }
    Some(user)
}

/// Drive one edit cycle through the same document workflow the TUI uses:
/// render the post, click its edit trigger, type into each field given on
/// the command line, click submit, and send the request synchronously.
pub fn edit_headless(backend: &Backend, post: &Post, args: &EditArgs) -> (Notice, Option<Post>) {
    let now = Instant::now();
    let mut doc = Document::new();
    let root = doc.root();
    let feed = doc.create("main", "", root, &[("id", "feed")], &["feed"]);
    let mut workflow = UpdateWorkflow::new(&backend.config, backend.endpoints.clone(), feed);
    if let Some(notice) = workflow.prepare(&mut doc, now).into_iter().next() {
        return (notice, None);
    }

    render_post(&mut doc, feed, post);
    let trigger = doc
        .query_attr(UPDATE_ID_ATTR)
        .into_iter()
        .find(|n| doc.attr(*n, UPDATE_ID_ATTR) == Some(post.id.as_str()));
    let Some(trigger) = trigger else {
        return (Notice::Error(format!("post not found: {}", post.id)), None);
    };
    let opened = workflow.click(&mut doc, trigger, now);
    if let Some(notice) = opened.notices.into_iter().next() {
        return (notice, None);
    }

    let edits = [
        (Field::Title, &args.title),
        (Field::Body, &args.body),
        (Field::Media, &args.media),
        (Field::Tags, &args.tags),
    ];
    for (field, value) in edits {
        let Some(value) = value else { continue };
        if let Some(node) = doc.get_element_by_id(field_id(field)) {
            workflow.input(&mut doc, node, value, now);
        }
    }

    let Some(submit) = doc.get_element_by_id(SUBMIT_ID) else {
        return (Notice::Error("edit form is missing its submit button".into()), None);
    };
    let outcome = workflow.click(&mut doc, submit, now);
    if let Some(notice) = outcome.notices.into_iter().next() {
        return (notice, None);
    }
    let Some(request) = outcome.submit else {
        return (Notice::Error("nothing to submit".into()), None);
    };

    let result = backend.api.call(&request.url, &request.options);
    let updated = result.as_ref().ok().cloned();
    let notice = workflow.complete_submit(&mut doc, &request.draft.id, result);
    (notice, updated)
}
