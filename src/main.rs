use driftfield::AppError;

fn main() -> Result<(), AppError> {
    driftfield::run()
}
