use crate::CLAP_STYLING;
use clap::{arg, command};
use std::net::SocketAddr;

pub(crate) fn command_argument_builder() -> clap::Command {
    command!()
        .bin_name("wavecrawl")
        .styles(CLAP_STYLING)
        .about("Serves a three-wave, same-site link crawler on POST /")
        .arg(arg!(-q --"quiet" "Suppress the startup banner").required(false))
        .arg(
            arg!(-b --"bind" <ADDR>)
                .required(false)
                .help("Address the HTTP server listens on")
                .value_parser(clap::value_parser!(SocketAddr)),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Timeout in seconds for every page fetch")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
