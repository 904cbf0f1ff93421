use anyhow::Context as _;
use prism::translate::{Context, OutputFormat};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(
    name = "prism",
    about = "Translate answer set programs into first-order theorem prover input."
)]
enum Command {
    #[structopt(
        name = "verify-program",
        about = "Translate a logic program into completed first-order definitions"
    )]
    VerifyProgram {
        /// Input program files
        #[structopt(parse(from_os_str), required(true))]
        input: Vec<std::path::PathBuf>,

        /// Output format (human-readable, tptp)
        #[structopt(long = "output-format", default_value = "human-readable")]
        output_format: OutputFormat,

        /// Do not complete predicate definitions
        #[structopt(long = "no-complete")]
        no_complete: bool,

        /// Do not simplify the translated formulas
        #[structopt(long = "no-simplify")]
        no_simplify: bool,

        /// Do not detect integer variables
        #[structopt(long = "no-detect-integers")]
        no_detect_integers: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run() {
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}

fn run() -> Result<(), anyhow::Error> {
    let command = Command::from_args();

    match command {
        Command::VerifyProgram {
            input,
            output_format,
            no_complete,
            no_simplify,
            no_detect_integers,
        } => {
            let mut context = Context {
                perform_completion: !no_complete,
                perform_simplification: !no_simplify,
                detect_integer_variables: !no_detect_integers,
                output_format,
                ..Context::default()
            };

            let stdout = std::io::stdout();
            let mut output = stdout.lock();

            prism::translate::translate(&input, &mut context, &mut output)
                .context("could not translate input program")
        }
    }
}
