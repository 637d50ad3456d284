use std::process::ExitCode;

fn main() -> ExitCode {
  dbt_docs_bundler::cli::run()
}
