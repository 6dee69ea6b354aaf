fn main() -> std::process::ExitCode {
    renovation_pack::run()
}
