use crate::api::ApiClient;
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::features::auth::{self, AuthGateway, TokenStore};
use crate::features::posts::FeedPager;
use crate::features::{analyze, categories, comments, geo, posts, profiles};
use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::warn;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

/// Run one CLI flow against the backend. Every invocation builds a fresh
/// gateway and resolves the persisted session before dispatching.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let api = ApiClient::new(&globals.api_url)?;
    let store = TokenStore::new(globals.token_file.clone());
    let gateway = AuthGateway::new(api, store);

    gateway.initialize().await;

    match action {
        Action::Login { username, password } => {
            let tokens = auth::client::login(gateway.api(), &username, &password).await?;
            gateway.login(&tokens.access, &tokens.refresh).await?;

            let session = gateway.snapshot();
            let user = session.user.ok_or_else(|| anyhow!("login left no user"))?;
            println!("logged in as {}", user.username);
        }
        Action::Logout => {
            let session = gateway.snapshot();

            if let Some(tokens) = session.tokens {
                // Best effort; the local session clears either way.
                if let Err(err) =
                    auth::client::notify_logout(gateway.api(), &tokens.access, &tokens.refresh)
                        .await
                {
                    warn!("backend logout failed: {err}");
                }
            }

            gateway.logout();
            println!("logged out");
        }
        Action::Register(mut account) => {
            if account.location.is_none() {
                if let (Some(lat), Some(lon)) = (account.latitude, account.longitude) {
                    match geo::reverse_geocode(lat, lon).await {
                        Ok(name) => account.location = name,
                        Err(err) => warn!("reverse geocoding failed: {err}"),
                    }
                }
            }

            let user_id = auth::client::register(gateway.api(), &account).await?;
            println!("registered user {user_id}, check your email for the verification code");
        }
        Action::VerifyEmail { user_id, code } => {
            auth::client::verify_email(gateway.api(), user_id, &code).await?;
            println!("email verified");
        }
        Action::ResendCode { user_id } => {
            auth::client::resend_code(gateway.api(), user_id).await?;
            println!("verification code sent");
        }
        Action::Profile { username } => match username {
            Some(username) => {
                let page = profiles::client::public_profile(&gateway, &username).await?;
                print_json(&page)?;
            }
            None => {
                let session = gateway.snapshot();
                let user = session.user.ok_or_else(|| anyhow!("not logged in"))?;
                print_json(&user)?;
            }
        },
        Action::UpdateProfile(update) => {
            let profile = profiles::client::update_profile(&gateway, &update).await?;
            print_json(&profile)?;
        }
        Action::Follow { user_id } => {
            profiles::client::follow(&gateway, user_id).await?;
            println!("follow toggled for user {user_id}");
        }
        Action::Feed { pages } => {
            let mut pager = FeedPager::new(10);

            for page in 1..=pages.max(1) {
                let ticket = pager.begin(page);
                let fetched = posts::client::feed(&gateway, page).await?;
                pager.apply(ticket, fetched);

                if !pager.has_more() {
                    break;
                }
            }

            print_json(&pager.into_posts())?;
        }
        Action::Popular { pages, page_size } => {
            let mut pager = FeedPager::new(page_size);

            for page in 1..=pages.max(1) {
                let ticket = pager.begin(page);
                let fetched = posts::client::popular(gateway.api(), page, page_size).await?;
                pager.apply(ticket, fetched);

                if !pager.has_more() {
                    break;
                }
            }

            print_json(&pager.into_posts())?;
        }
        Action::Posts => {
            let listing = posts::client::list(&gateway).await?;
            print_json(&listing)?;
        }
        Action::Post { id } => {
            let post = posts::client::detail(&gateway, id).await?;
            print_json(&post)?;
        }
        Action::CreatePost(post) => {
            let created = posts::client::create(&gateway, &post).await?;
            print_json(&created)?;
        }
        Action::EditPost { id, post } => {
            let updated = posts::client::update(&gateway, id, &post).await?;
            print_json(&updated)?;
        }
        Action::DeletePost { id } => {
            posts::client::delete(&gateway, id).await?;
            println!("post {id} deleted");
        }
        Action::Like { id } => {
            posts::client::like(&gateway, id).await?;
            println!("like toggled for post {id}");
        }
        Action::Comments { post } => {
            let flat = comments::client::list(&gateway, post).await?;
            let threads = comments::organize(flat);
            print_json(&threads)?;
        }
        Action::Comment {
            post,
            content,
            parent,
        } => {
            let comment = comments::client::create(&gateway, post, &content, parent).await?;
            print_json(&comment)?;
        }
        Action::Categories => {
            let listing = categories::client::list(&gateway).await?;
            print_json(&listing)?;
        }
        Action::Search { query } => {
            let hits = posts::client::search(&gateway, &query).await?;
            print_json(&hits)?;
        }
        Action::AnalyzeImage(source) => {
            let suggestions = analyze::client::analyze(&gateway, &source).await?;
            print_json(&suggestions)?;
        }
    }

    Ok(())
}
