//! Post, feed, and comment subcommands.

use clap::{value_parser, Arg, Command};

fn post_fields(command: Command) -> Command {
    command
        .arg(Arg::new("summary").long("summary"))
        .arg(
            Arg::new("category")
                .long("category")
                .value_parser(value_parser!(u64))
                .help("Category id"),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .action(clap::ArgAction::Append)
                .help("Repeat for multiple tags"),
        )
        .arg(Arg::new("location").long("location"))
        .arg(
            Arg::new("latitude")
                .long("latitude")
                .value_parser(value_parser!(f64))
                .requires("longitude"),
        )
        .arg(
            Arg::new("longitude")
                .long("longitude")
                .value_parser(value_parser!(f64))
                .requires("latitude"),
        )
        .arg(Arg::new("country").long("country").requires("city"))
        .arg(Arg::new("city").long("city").requires("country"))
        .arg(Arg::new("cover").long("cover").help("Cover image file"))
}

pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new("feed")
            .about("Personalized feed, newest first")
            .arg(
                Arg::new("pages")
                    .long("pages")
                    .value_parser(value_parser!(u32))
                    .default_value("1")
                    .help("How many pages to fetch and merge"),
            ),
        Command::new("popular")
            .about("Popular posts, no account needed")
            .arg(
                Arg::new("pages")
                    .long("pages")
                    .value_parser(value_parser!(u32))
                    .default_value("1"),
            )
            .arg(
                Arg::new("page-size")
                    .long("page-size")
                    .value_parser(value_parser!(usize))
                    .default_value("10"),
            ),
        Command::new("posts").about("List your visible posts"),
        Command::new("post").about("Show one post").arg(
            Arg::new("id")
                .value_parser(value_parser!(u64))
                .required(true),
        ),
        post_fields(
            Command::new("create-post")
                .about("Publish a post")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("content").long("content").required(true)),
        ),
        post_fields(
            Command::new("edit-post")
                .about("Update a post")
                .arg(
                    Arg::new("id")
                        .value_parser(value_parser!(u64))
                        .required(true),
                )
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("content").long("content").required(true)),
        ),
        Command::new("delete-post").about("Delete a post").arg(
            Arg::new("id")
                .value_parser(value_parser!(u64))
                .required(true),
        ),
        Command::new("like").about("Toggle your like on a post").arg(
            Arg::new("id")
                .value_parser(value_parser!(u64))
                .required(true),
        ),
        Command::new("comments")
            .about("Show a post's comment threads")
            .arg(
                Arg::new("post")
                    .value_parser(value_parser!(u64))
                    .required(true),
            ),
        Command::new("comment")
            .about("Comment on a post, or reply to a comment")
            .arg(
                Arg::new("post")
                    .value_parser(value_parser!(u64))
                    .required(true),
            )
            .arg(Arg::new("content").long("content").required(true))
            .arg(
                Arg::new("parent")
                    .long("parent")
                    .value_parser(value_parser!(u64))
                    .help("Comment id to reply to"),
            ),
        Command::new("categories").about("List post categories"),
        Command::new("search").about("Full-text post search").arg(
            Arg::new("query")
                .required(true),
        ),
    ]
}
