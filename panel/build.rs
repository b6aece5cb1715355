fn main() {
    slint_build::compile("ui/panel.slint").unwrap();
}
