fn main() -> std::process::ExitCode {
    sbpost_lib::run()
}
