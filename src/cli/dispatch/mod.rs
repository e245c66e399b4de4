use crate::cli::actions::Action;
use crate::cli::globals::GlobalArgs;
use crate::features::analyze::AnalyzeSource;
use crate::features::auth::client::NewAccount;
use crate::features::posts::types::{LocationDetails, NewPost};
use crate::features::profiles::ProfileUpdate;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

fn default_token_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".voyageview")
        .join("tokens.json")
}

fn string(matches: &clap::ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    string(matches, id).with_context(|| format!("missing required argument: --{id}"))
}

fn new_post(matches: &clap::ArgMatches) -> Result<NewPost> {
    let location_details = match (string(matches, "country"), string(matches, "city")) {
        (Some(country), Some(city)) => Some(LocationDetails { country, city }),
        _ => None,
    };

    Ok(NewPost {
        title: required(matches, "title")?,
        content: required(matches, "content")?,
        summary: string(matches, "summary"),
        category_id: matches.get_one::<u64>("category").copied(),
        tags: matches
            .get_many::<String>("tag")
            .map(|tags| tags.cloned().collect())
            .unwrap_or_default(),
        location: string(matches, "location"),
        latitude: matches.get_one::<f64>("latitude").copied(),
        longitude: matches.get_one::<f64>("longitude").copied(),
        location_details,
        cover_image: string(matches, "cover").map(PathBuf::from),
    })
}

/// Map parsed arguments to an action plus the connection globals.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = GlobalArgs::new(
        required(matches, "api-url")?,
        string(matches, "token-file")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_file),
    );

    let (name, sub) = matches
        .subcommand()
        .context("a subcommand is required")?;

    let action = match name {
        "login" => Action::Login {
            username: required(sub, "username")?,
            password: SecretString::from(required(sub, "password")?),
        },
        "logout" => Action::Logout,
        "register" => Action::Register(Box::new(NewAccount {
            username: required(sub, "username")?,
            email: required(sub, "email")?,
            password: SecretString::from(required(sub, "password")?),
            confirm_password: SecretString::from(required(sub, "password")?),
            full_name: required(sub, "full-name")?,
            date_of_birth: string(sub, "date-of-birth"),
            location: string(sub, "location"),
            latitude: sub.get_one::<f64>("latitude").copied(),
            longitude: sub.get_one::<f64>("longitude").copied(),
            profile_picture: string(sub, "picture").map(PathBuf::from),
        })),
        "verify-email" => Action::VerifyEmail {
            user_id: sub
                .get_one::<u64>("user-id")
                .copied()
                .context("missing required argument: --user-id")?,
            code: required(sub, "code")?,
        },
        "resend-code" => Action::ResendCode {
            user_id: sub
                .get_one::<u64>("user-id")
                .copied()
                .context("missing required argument: --user-id")?,
        },
        "profile" => Action::Profile {
            username: string(sub, "username"),
        },
        "update-profile" => Action::UpdateProfile(ProfileUpdate {
            full_name: string(sub, "full-name"),
            email: string(sub, "email"),
            bio: string(sub, "bio"),
            location: string(sub, "location"),
            profile_picture: string(sub, "picture").map(PathBuf::from),
        }),
        "follow" => Action::Follow {
            user_id: sub
                .get_one::<u64>("user-id")
                .copied()
                .context("missing user id")?,
        },
        "feed" => Action::Feed {
            pages: sub.get_one::<u32>("pages").copied().unwrap_or(1),
        },
        "popular" => Action::Popular {
            pages: sub.get_one::<u32>("pages").copied().unwrap_or(1),
            page_size: sub.get_one::<usize>("page-size").copied().unwrap_or(10),
        },
        "posts" => Action::Posts,
        "post" => Action::Post {
            id: sub.get_one::<u64>("id").copied().context("missing post id")?,
        },
        "create-post" => Action::CreatePost(Box::new(new_post(sub)?)),
        "edit-post" => Action::EditPost {
            id: sub.get_one::<u64>("id").copied().context("missing post id")?,
            post: Box::new(new_post(sub)?),
        },
        "delete-post" => Action::DeletePost {
            id: sub.get_one::<u64>("id").copied().context("missing post id")?,
        },
        "like" => Action::Like {
            id: sub.get_one::<u64>("id").copied().context("missing post id")?,
        },
        "comments" => Action::Comments {
            post: sub
                .get_one::<u64>("post")
                .copied()
                .context("missing post id")?,
        },
        "comment" => Action::Comment {
            post: sub
                .get_one::<u64>("post")
                .copied()
                .context("missing post id")?,
            content: required(sub, "content")?,
            parent: sub.get_one::<u64>("parent").copied(),
        },
        "categories" => Action::Categories,
        "search" => Action::Search {
            query: required(sub, "query")?,
        },
        "analyze-image" => match (string(sub, "file"), string(sub, "url")) {
            (Some(file), None) => Action::AnalyzeImage(AnalyzeSource::Upload(PathBuf::from(file))),
            (None, Some(url)) => Action::AnalyzeImage(AnalyzeSource::Url(url)),
            _ => return Err(anyhow!("analyze-image needs exactly one of --file or --url")),
        },
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok((action, globals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn parse(args: &[&str]) -> (Action, GlobalArgs) {
        let matches = commands::new().get_matches_from(args);
        handler(&matches).expect("handler")
    }

    #[test]
    fn login_carries_credentials() {
        let (action, globals) = parse(&[
            "voyageview",
            "--api-url",
            "http://localhost:9000",
            "login",
            "--username",
            "alice",
            "--password",
            "secret",
        ]);

        assert_eq!(globals.api_url, "http://localhost:9000");
        match action {
            Action::Login { username, .. } => assert_eq!(username, "alice"),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn token_file_override_is_honored() {
        let (_, globals) = parse(&[
            "voyageview",
            "--token-file",
            "/tmp/alt-tokens.json",
            "categories",
        ]);

        assert_eq!(globals.token_file, PathBuf::from("/tmp/alt-tokens.json"));
    }

    #[test]
    fn create_post_collects_tags_and_location() {
        let (action, _) = parse(&[
            "voyageview",
            "create-post",
            "--title",
            "Lisbon in two days",
            "--content",
            "Start at the castle.",
            "--tag",
            "city",
            "--tag",
            "portugal",
            "--country",
            "Portugal",
            "--city",
            "Lisbon",
        ]);

        match action {
            Action::CreatePost(post) => {
                assert_eq!(post.tags, vec!["city", "portugal"]);
                let details = post.location_details.expect("details");
                assert_eq!(details.city, "Lisbon");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn comment_reply_carries_parent() {
        let (action, _) = parse(&[
            "voyageview",
            "comment",
            "42",
            "--content",
            "great tip",
            "--parent",
            "7",
        ]);

        match action {
            Action::Comment {
                post,
                parent,
                content,
            } => {
                assert_eq!(post, 42);
                assert_eq!(parent, Some(7));
                assert_eq!(content, "great tip");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn analyze_image_requires_a_source() {
        let matches = commands::new().get_matches_from(vec!["voyageview", "analyze-image"]);
        assert!(handler(&matches).is_err());
    }
}
