//! Indexing Integration Tests
//!
//! Runs the indexer against real content trees and checks both artifacts.

use std::collections::BTreeSet;
use std::path::Path;

use content_pipeline::config::ResolvedConfig;
use content_pipeline::domain::{parse_date, truncate_excerpt, ContentKind};
use content_pipeline::{ContentIndex, Indexer};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

async fn run(temp: &TempDir) -> (ResolvedConfig, content_pipeline::IndexReport, serde_json::Value, String) {
    let config = ResolvedConfig::with_root(temp.path());
    let report = Indexer::new(config.clone()).run().await.unwrap();

    let index = std::fs::read_to_string(&config.index_output).unwrap();
    let index: serde_json::Value = serde_json::from_str(&index).unwrap();
    let modules = std::fs::read_to_string(&config.modules_output).unwrap();

    (config, report, index, modules)
}

/// Keys of the generated module map, read back from the module source
fn module_keys(modules: &str) -> BTreeSet<String> {
    modules
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = line.strip_prefix('"')?;
            let end = rest.find("\": () => import(")?;
            Some(rest[..end].to_string())
        })
        .collect()
}

fn slugs(index: &serde_json::Value) -> Vec<String> {
    index
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_tree_produces_valid_empty_artifacts() {
    let temp = TempDir::new().unwrap();
    let (config, report, index, modules) = run(&temp).await;

    assert_eq!(index, serde_json::json!([]));
    assert!(modules.contains("export const contentModules"));
    assert!(modules.contains("= {};"));
    assert!(module_keys(&modules).is_empty());
    assert_eq!(report.indexed(), 0);

    // Expected directories are created
    assert!(config.articles_dir.is_dir());
    assert!(config.tutorials_dir.join("company-formation").is_dir());
}

#[tokio::test]
async fn test_drafts_and_untitled_articles_are_excluded() {
    let temp = TempDir::new().unwrap();
    let blog = "src/content/blog";
    write(temp.path(), &format!("{}/first.mdx", blog), "---\ntitle: First\ndate: 2024-01-01\n---\nOne");
    write(temp.path(), &format!("{}/second.mdx", blog), "---\ntitle: Second\ndate: 2024-02-01\n---\nTwo");
    write(
        temp.path(),
        &format!("{}/unfinished.mdx", blog),
        "---\ntitle: Unfinished\ndraft: true\n---\nSoon",
    );
    write(
        temp.path(),
        &format!("{}/untitled.mdx", blog),
        "---\ndescription: Forgot the title\n---\nBody",
    );

    let (_, report, index, modules) = run(&temp).await;

    assert_eq!(slugs(&index), vec!["second", "first"]);

    let keys = module_keys(&modules);
    assert!(!keys.contains("article/unfinished"));
    assert!(!keys.contains("article/untitled"));
    assert!(!modules.contains("unfinished.mdx"));

    assert!(report.was_skipped("src/content/blog/untitled.mdx"));
    assert!(!report.was_skipped("src/content/blog/unfinished.mdx"));
    assert_eq!(report.counts(ContentKind::Article).drafts, 1);
}

#[tokio::test]
async fn test_tutorial_categories_come_from_directories() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/content/learn/company-formation/register.mdx",
        "---\ntitle: Register\ndate: 2024-03-01\n---\nBody",
    );
    write(
        temp.path(),
        "src/content/learn/banking/open-account.mdx",
        "---\ntitle: Open an account\ndate: 2024-02-01\n---\nBody",
    );

    let (_, _, index, modules) = run(&temp).await;
    let records = index.as_array().unwrap();
    assert_eq!(records.len(), 2);

    let register = records.iter().find(|r| r["slug"] == "register").unwrap();
    assert_eq!(register["category"], "company-formation");
    assert_eq!(register["path"], "/learn/company-formation/register");
    assert_eq!(register["type"], "tutorial");
    assert_eq!(register["lastUpdated"], "2024-03-01");

    let open = records.iter().find(|r| r["slug"] == "open-account").unwrap();
    assert_eq!(open["category"], "banking");
    assert_eq!(open["path"], "/learn/banking/open-account");

    assert!(modules.contains(
        "\"tutorial/banking/open-account\": () => import(\"../content/learn/banking/open-account.mdx\")"
    ));
}

#[tokio::test]
async fn test_index_and_module_map_have_the_same_members() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/content/blog/a.mdx", "---\ntitle: A\n---\n");
    write(temp.path(), "src/content/blog/b.mdx", "---\ntitle: B\ndraft: true\n---\n");
    write(temp.path(), "src/content/blog/c.mdx", "not frontmatter");
    write(temp.path(), "src/content/learn/banking/d.mdx", "---\ntitle: D\n---\n");
    write(temp.path(), "src/content/learn/tax/vat/e.mdx", "---\ntitle: E\n---\n");

    let (_, _, index, modules) = run(&temp).await;

    let from_index: BTreeSet<String> = index
        .as_array()
        .unwrap()
        .iter()
        .map(|r| match r["type"].as_str().unwrap() {
            "article" => format!("article/{}", r["slug"].as_str().unwrap()),
            _ => format!(
                "tutorial/{}/{}",
                r["category"].as_str().unwrap(),
                r["slug"].as_str().unwrap()
            ),
        })
        .collect();

    assert_eq!(from_index, module_keys(&modules));
    assert_eq!(from_index.len(), 3);
    assert!(from_index.contains("tutorial/tax/vat/e"));
}

#[tokio::test]
async fn test_index_sorted_by_date_descending() {
    let temp = TempDir::new().unwrap();
    let dates = [
        ("a", "2023-05-01"),
        ("b", "2024-11-20T08:00:00Z"),
        ("c", "2024-01-01"),
        ("d", "2022-12-31"),
    ];
    for (slug, date) in dates {
        write(
            temp.path(),
            &format!("src/content/blog/{}.mdx", slug),
            &format!("---\ntitle: {}\ndate: {}\n---\n", slug, date),
        );
    }
    write(
        temp.path(),
        "src/content/learn/banking/e.mdx",
        "---\ntitle: e\ndate: 2024-06-01\n---\n",
    );

    let (config, _, index, _) = run(&temp).await;
    assert_eq!(slugs(&index), vec!["b", "e", "c", "a", "d"]);

    let loaded = ContentIndex::load(&config.index_output).await.unwrap();
    for pair in loaded.records().windows(2) {
        let (a, b) = (parse_date(&pair[0].publish_date), parse_date(&pair[1].publish_date));
        assert!(a.unwrap() >= b.unwrap());
    }
}

#[tokio::test]
async fn test_description_falls_back_to_first_paragraph() {
    let temp = TempDir::new().unwrap();
    let paragraph = "Every company registered in England and Wales needs a registered office \
                     address, at least one director and a statement of capital describing the \
                     shares it issues to its founding members.";
    write(
        temp.path(),
        "src/content/blog/office.mdx",
        &format!("---\ntitle: Registered office\n---\n\n{}\n\nSecond paragraph.", paragraph),
    );

    let (_, _, index, _) = run(&temp).await;
    let record = &index[0];

    let expected = truncate_excerpt(paragraph);
    assert!(expected.ends_with("..."));
    assert_eq!(record["description"], expected.as_str());

    let collapsed = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(record["excerpt"], collapsed.as_str());
}

#[tokio::test]
async fn test_explicit_excerpt_is_used_for_description() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/content/blog/summary.mdx",
        "---\ntitle: A\nexcerpt: Author summary\n---\n\nBody paragraph text.\n",
    );

    let (_, _, index, _) = run(&temp).await;

    assert_eq!(index[0]["excerpt"], "Author summary");
    assert_eq!(index[0]["description"], "Author summary");
}

#[tokio::test]
async fn test_unscannable_article_root_does_not_block_tutorials() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("src/content")).unwrap();
    std::fs::write(temp.path().join("src/content/blog"), "not a directory").unwrap();
    write(
        temp.path(),
        "src/content/learn/banking/open-account.mdx",
        "---\ntitle: Open an account\ndate: 2024-02-01\n---\nBody",
    );

    let (_, report, index, modules) = run(&temp).await;

    assert_eq!(report.indexed(), 1);
    assert_eq!(report.counts(ContentKind::Tutorial).indexed, 1);
    assert_eq!(report.discovery_failures.len(), 1);
    assert!(report.discovery_failures[0].starts_with("article"));

    assert_eq!(slugs(&index), vec!["open-account"]);
    let expected: BTreeSet<String> = ["tutorial/banking/open-account".to_string()].into();
    assert_eq!(module_keys(&modules), expected);
}

#[tokio::test]
async fn test_defaults_are_applied() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/content/blog/bare.mdx", "---\ntitle: Bare\n---\n");

    let (config, _, index, _) = run(&temp).await;
    let record = &index[0];

    assert_eq!(record["category"], "Uncategorised");
    assert_eq!(record["author"], config.default_author.as_str());
    assert_eq!(record["description"], "Bare");
    assert_eq!(record["filePath"], "src/content/blog/bare.mdx");
    assert_eq!(record["tags"], serde_json::json!([]));
    assert!(parse_date(record["date"].as_str().unwrap()).is_some());
    assert!(record.get("lastUpdated").is_none());
}

#[tokio::test]
async fn test_rerun_replaces_stale_artifacts() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/content/blog/old.mdx", "---\ntitle: Old\n---\n");
    let (_, _, index, _) = run(&temp).await;
    assert_eq!(slugs(&index), vec!["old"]);

    std::fs::remove_file(temp.path().join("src/content/blog/old.mdx")).unwrap();
    write(temp.path(), "src/content/blog/new.mdx", "---\ntitle: New\n---\n");

    let (_, _, index, modules) = run(&temp).await;
    assert_eq!(slugs(&index), vec!["new"]);
    assert!(!modules.contains("old.mdx"));
}
