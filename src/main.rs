use gitman::core::errors::Error;

fn main() {
    if let Err(err) = gitman::cli::run() {
        eprintln!("error: {:#}", err);

        // Suggest the flag that would make the command succeed, if one exists.
        if let Some(hint) = err.downcast_ref::<Error>().and_then(Error::hint) {
            eprintln!("{}", hint);
        }

        std::process::exit(1);
    }
}
