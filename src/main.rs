fn main() {
    rat25f::cli::run();
}
