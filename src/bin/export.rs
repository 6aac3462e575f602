use blogfeed::{
    client::{BlogClient, PostFeed},
    config::Credentials,
    export::{ExportFormat, write_export},
};

const PAGE_SIZE: u32 = 50;

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: export <backend-url> <store-domain> <access-token> <jsonl|txt> [out-dir]");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1); // 跳过程序名

    let mut next_arg = |name: &str| {
        args.next().unwrap_or_else(|| {
            eprintln!("Missing <{name}>");
            print_usage_and_exit();
        })
    };

    let backend = next_arg("backend-url");
    let domain = next_arg("store-domain");
    let token = next_arg("access-token");
    let format: ExportFormat = match next_arg("format").parse() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{e}");
            print_usage_and_exit();
        }
    };
    let out_dir = args.next().unwrap_or_else(|| ".".to_string());

    if args.next().is_some() {
        eprintln!("Too many arguments provided.");
        print_usage_and_exit();
    }

    let client = BlogClient::new(&backend);
    let credentials = Credentials::new(domain, token);

    let mut feed = PostFeed::new();
    if let Err(e) = feed.load_all(&client, PAGE_SIZE, Some(&credentials)).await {
        eprintln!("❌ Failed to fetch blog posts: {e}");
        std::process::exit(1);
    }

    if feed.posts().is_empty() {
        println!("ℹ️ No blog posts found, nothing exported");
        return;
    }

    match write_export(&out_dir, &credentials.store_domain, format, feed.posts()) {
        Ok(path) => println!("✅ {} posts exported to {}", feed.posts().len(), path.display()),
        Err(e) => {
            eprintln!("❌ Failed to write export: {e}");
            std::process::exit(1);
        }
    }
}
