use std::fs;
use std::io::Write;

use apriori_miner::config::{ConfigOverrides, MinerConfig};
use apriori_miner::item_sets::ItemSetMiner;
use apriori_miner::{generate_rules, loader, mine_frequent_itemsets, report, Apriori, Dataset};
use tempfile::tempdir;

const GROCERIES: &str = "Basket,Item\n\
                         1,bread\n\
                         1,milk\n\
                         2,bread\n\
                         2,butter\n\
                         3,bread\n\
                         3,milk\n\
                         3,butter\n\
                         3,milk\n\
                         4,milk\n";

fn names(dataset: &Dataset, items: &[apriori_miner::ItemId]) -> Vec<String> {
    dataset.item_names(items).into_iter().map(str::to_owned).collect()
}

#[test]
fn groceries_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("baskets.csv");
    fs::write(&input, GROCERIES).unwrap();

    let dataset = loader::load_csv(&input).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.universe(), ["bread", "butter", "milk"]);

    let itemsets = mine_frequent_itemsets(&dataset, 0.5, 2);
    let singles: Vec<(Vec<String>, f64)> = itemsets
        .iter()
        .filter(|f| f.length() == 1)
        .map(|f| (names(&dataset, f.items()), f.support))
        .collect();
    assert_eq!(
        singles,
        vec![
            (vec!["bread".to_owned()], 0.75),
            (vec!["butter".to_owned()], 0.5),
            (vec!["milk".to_owned()], 0.75),
        ]
    );
    let pairs: Vec<Vec<String>> = itemsets
        .iter()
        .filter(|f| f.length() == 2)
        .map(|f| names(&dataset, f.items()))
        .collect();
    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains(&vec!["bread".to_owned(), "milk".to_owned()]));
    assert!(pairs.contains(&vec!["bread".to_owned(), "butter".to_owned()]));

    let rules = generate_rules(&itemsets, 0.6).unwrap();
    assert_eq!(rules.len(), 4);
    let butter_bread = rules
        .iter()
        .find(|r| names(&dataset, r.antecedent.items()) == ["butter"])
        .unwrap();
    assert_eq!(butter_bread.confidence, 1.0);
    assert!(butter_bread.conviction.is_infinite());

    let itemsets_path = dir.path().join("out/frequent_itemsets.csv");
    let rules_path = dir.path().join("out/association_rules.csv");
    report::save_itemsets(&itemsets_path, &dataset, &itemsets).unwrap();
    report::save_rules(&rules_path, &dataset, &rules).unwrap();

    let itemsets_csv = fs::read_to_string(&itemsets_path).unwrap();
    assert!(itemsets_csv.starts_with("support,itemsets,length\n0.750000,{bread},1\n"));
    let rules_csv = fs::read_to_string(&rules_path).unwrap();
    assert_eq!(rules_csv.lines().count(), 5);
    assert!(rules_csv.contains("{butter},{bread},0.500000,1.000000,1.333333,0.125000,inf"));
}

#[test]
fn miner_trait_matches_free_function() {
    let dataset = loader::read_transactions(GROCERIES.as_bytes()).unwrap();
    let via_trait = Apriori::new(3).mine(&dataset, 0.25);
    let via_fn = mine_frequent_itemsets(&dataset, 0.25, 3);
    assert_eq!(via_trait, via_fn);
    assert!(via_fn.iter().any(|f| f.length() == 3));
}

#[test]
fn config_file_and_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("apriori.toml");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "min_support = 0.05").unwrap();
    writeln!(file, "min_confidence = 0.4").unwrap();
    writeln!(file, "rules_output = \"rules.csv\"").unwrap();
    drop(file);

    let overrides = ConfigOverrides {
        min_confidence: Some(0.7),
        ..Default::default()
    };
    let config = MinerConfig::load(Some(&path), &overrides).unwrap();
    assert_eq!(config.min_support, 0.05);
    assert_eq!(config.min_confidence, 0.7);
    assert_eq!(config.max_len, 5);
    assert_eq!(config.rules_output, std::path::PathBuf::from("rules.csv"));
}

#[test]
fn empty_input_mines_nothing() {
    let dataset = loader::read_transactions("basket,item\n".as_bytes()).unwrap();
    let itemsets = mine_frequent_itemsets(&dataset, 0.1, 3);
    assert!(itemsets.is_empty());
    assert!(generate_rules(&itemsets, 0.1).unwrap().is_empty());
}
