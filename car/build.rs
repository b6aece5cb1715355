fn main() {
    slint_build::compile("ui/car.slint").unwrap();
}
