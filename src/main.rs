use wisp::{DeviceClass, Theme, TrailConfig};

fn main() {
    let mut config = TrailConfig::fluid();
    let mut theme = Theme::Dark;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "fluid" => config = TrailConfig::fluid(),
            "smoke" => config = TrailConfig::smoke(),
            "light" => theme = Theme::Light,
            "dark" => theme = Theme::Dark,
            other => {
                eprintln!("Usage: wisp [fluid|smoke] [dark|light] (unknown arg: {other})");
                std::process::exit(2);
            }
        }
    }

    if let Err(e) = wisp::run(config, theme, DeviceClass::Desktop) {
        eprintln!("wisp: {e}");
        std::process::exit(1);
    }
}
