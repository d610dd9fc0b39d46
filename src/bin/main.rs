// Copyright 2025 Andrea Gilot
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use clap::{Arg, ArgAction, Command};
use korpus::phases::{dtm, expand, subjects};
use korpus::utils::error::*;
use korpus::utils::logger::{init_tracing, Logger};

fn cli() -> Command {
    Command::new("korpus")
        .about("Document-term matrices of corpora grouped by their metadata.")
        .subcommand(expand::cli())
        .subcommand(subjects::cli())
        .subcommand(dtm::cli())
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Print diagnostics and stack trace on error.")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .disable_version_flag(true)
}

fn main() {
    let cli_args = cli().get_matches();
    let debug = cli_args.get_flag("debug");
    init_tracing(debug);
    let mut logger = Logger::new();

    // Calls to unwrap are safe because the arguments are required or have default values.
    let res: Result<(), Error> =
        match cli_args.subcommand_name() {
            Some (subcommand) => {
                ok_or_else(cli_args.subcommand_matches(subcommand),
                &format!("The subcommand {} is not available. Run the program with the --help flag to see the list of subcommands", subcommand)).and_then
                (
                    |cli_subargs| {
                            if subcommand == expand::cli().get_name() {
                                expand::run(
                                    cli_subargs.get_one::<String>("input").unwrap(),
                                    cli_subargs.get_one::<String>("output").map(|x| x.as_str()),
                                    cli_subargs.get_one::<String>("column").unwrap(),
                                    cli_subargs.get_one::<String>("id").unwrap(),
                                    cli_subargs.get_flag("force"),
                                    &mut logger
                                )
                            } else if subcommand == subjects::cli().get_name() {
                                subjects::run(
                                    cli_subargs.get_one::<String>("input").unwrap(),
                                    cli_subargs.get_one::<String>("output").map(|x| x.as_str()),
                                    cli_subargs.get_one::<String>("column").unwrap(),
                                    cli_subargs.get_one::<String>("case").unwrap(),
                                    cli_subargs.get_flag("percent"),
                                    cli_subargs.get_one::<String>("id").unwrap(),
                                    cli_subargs.get_flag("force"),
                                    &mut logger
                                )
                            } else if subcommand == dtm::cli().get_name() {
                                let columns: Vec<&str> = cli_subargs
                                    .get_many::<String>("column")
                                    .map(|c| c.map(|x| x.as_str()).collect())
                                    .unwrap_or_default();
                                dtm::run(
                                    cli_subargs.get_one::<String>("input").unwrap(),
                                    cli_subargs.get_one::<String>("counts").unwrap(),
                                    cli_subargs.get_one::<String>("output").map(|x| x.as_str()),
                                    &columns,
                                    cli_subargs.get_one::<String>("words").map(|x| x.as_str()),
                                    cli_subargs.get_one::<String>("urns").map(|x| x.as_str()),
                                    cli_subargs.get_flag("sort"),
                                    *cli_subargs.get_one::<usize>("max").unwrap(),
                                    *cli_subargs.get_one::<usize>("sample").unwrap(),
                                    *cli_subargs.get_one::<u64>("seed").unwrap(),
                                    cli_subargs.get_one::<String>("id").unwrap(),
                                    cli_subargs.get_flag("force"),
                                    &mut logger,
                                )
                            }
                            else {
                                Error::new(&format!("The subcommand {} is not available. Run the program with the --help flag to see the list of subcommands", subcommand)).to_res()
                            }
                    }
                )
        }
        None => Error::new("You need to specify a subcommand. Run the program with the --help flag to see the list of subcommands").to_res()
    };

    let _ = logger.log(&res_to_string(res, debug));
}
