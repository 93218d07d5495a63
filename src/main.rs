use anyhow::Result;

fn main() -> Result<()> {
    count_loc::app::run()
}
