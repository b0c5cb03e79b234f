use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("svccall {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: svccall");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SVCCALL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("SVCCALL_GIT_HASH").unwrap_or("unknown"));
    println!("built-in services: {}", builtin_services());

    Ok(SUCCESS)
}

fn builtin_services() -> String {
    match svccall_schema::ServiceCatalog::builtin() {
        Ok(catalog) => {
            let names: Vec<&str> = catalog
                .services()
                .map(|service| service.service.as_str())
                .collect();
            names.join(", ")
        }
        Err(err) => format!("unavailable ({err})"),
    }
}
