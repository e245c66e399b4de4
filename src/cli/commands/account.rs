//! Account and session subcommands.

use clap::{value_parser, Arg, Command};

pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new("login")
            .about("Sign in and persist the session")
            .arg(
                Arg::new("username")
                    .short('u')
                    .long("username")
                    .required(true),
            )
            .arg(
                Arg::new("password")
                    .short('p')
                    .long("password")
                    .env("VOYAGEVIEW_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            ),
        Command::new("logout").about("Clear the session, notifying the backend best-effort"),
        Command::new("register")
            .about("Create an account")
            .arg(
                Arg::new("username")
                    .short('u')
                    .long("username")
                    .required(true),
            )
            .arg(Arg::new("email").short('e').long("email").required(true))
            .arg(
                Arg::new("password")
                    .short('p')
                    .long("password")
                    .env("VOYAGEVIEW_PASSWORD")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(
                Arg::new("full-name")
                    .long("full-name")
                    .required(true),
            )
            .arg(Arg::new("date-of-birth").long("date-of-birth"))
            .arg(Arg::new("location").long("location"))
            .arg(
                Arg::new("latitude")
                    .long("latitude")
                    .value_parser(value_parser!(f64))
                    .requires("longitude")
                    .help("With --longitude, resolves a location name when none is given"),
            )
            .arg(
                Arg::new("longitude")
                    .long("longitude")
                    .value_parser(value_parser!(f64))
                    .requires("latitude"),
            )
            .arg(Arg::new("picture").long("picture").help("Profile picture file")),
        Command::new("verify-email")
            .about("Confirm the emailed verification code")
            .arg(
                Arg::new("user-id")
                    .long("user-id")
                    .value_parser(value_parser!(u64))
                    .required(true),
            )
            .arg(Arg::new("code").long("code").required(true)),
        Command::new("resend-code")
            .about("Request a fresh verification code")
            .arg(
                Arg::new("user-id")
                    .long("user-id")
                    .value_parser(value_parser!(u64))
                    .required(true),
            ),
        Command::new("profile")
            .about("Show your profile, or another user's")
            .arg(Arg::new("username").help("Show this user instead of yourself")),
        Command::new("update-profile")
            .about("Change fields on your profile")
            .arg(Arg::new("full-name").long("full-name"))
            .arg(Arg::new("email").long("email"))
            .arg(Arg::new("bio").long("bio"))
            .arg(Arg::new("location").long("location"))
            .arg(Arg::new("picture").long("picture").help("Profile picture file")),
        Command::new("follow")
            .about("Toggle following a user")
            .arg(
                Arg::new("user-id")
                    .value_parser(value_parser!(u64))
                    .required(true),
            ),
        Command::new("analyze-image")
            .about("Suggest post fields from a cover image")
            .arg(Arg::new("file").long("file").help("Local image to upload"))
            .arg(
                Arg::new("url")
                    .long("url")
                    .conflicts_with("file")
                    .help("URL of an already hosted image"),
            ),
    ]
}
