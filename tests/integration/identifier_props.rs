use proptest::prelude::*;
use std::collections::HashSet;
use vdisk::{DirectoryIdentifier, FileIdentifier};

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_ .-]{0,10}[a-zA-Z0-9_]"
}

fn absolute_path() -> impl Strategy<Value = (String, Vec<String>)> {
    ("[a-zA-Z]", prop::collection::vec(segment(), 1..6)).prop_map(|(drive, segments)| {
        (format!("{}:\\{}", drive, segments.join("\\")), segments)
    })
}

proptest! {
    #[test]
    fn case_and_trailing_separator_do_not_matter((path, _) in absolute_path()) {
        let plain = DirectoryIdentifier::new(&path).unwrap();
        let shouted = DirectoryIdentifier::new(&format!("{}\\", path.to_uppercase())).unwrap();
        let forward = DirectoryIdentifier::new(&path.replace('\\', "/")).unwrap();

        prop_assert_eq!(&plain, &shouted);
        prop_assert_eq!(&plain, &forward);

        let set: HashSet<_> = [plain.clone(), shouted, forward].into_iter().collect();
        prop_assert_eq!(set.len(), 1);
        prop_assert_eq!(plain.full_name(), path);
    }

    #[test]
    fn split_runs_from_root_to_self((path, segments) in absolute_path()) {
        let id = DirectoryIdentifier::new(&path).unwrap();
        let chain = id.split();

        prop_assert_eq!(chain.len(), segments.len() + 1);
        prop_assert!(chain[0].is_root());
        prop_assert_eq!(chain.last(), Some(&id));
        for pair in chain.windows(2) {
            prop_assert_eq!(pair[1].parent(), Some(pair[0].clone()));
            prop_assert!(pair[0].contains(&pair[1]));
        }
    }

    #[test]
    fn dot_segments_collapse((path, _) in absolute_path(), extra in segment()) {
        let id = DirectoryIdentifier::new(&path).unwrap();
        let detour = DirectoryIdentifier::new(&format!("{}\\.\\{}\\..", path, extra)).unwrap();
        prop_assert_eq!(id, detour);
    }

    #[test]
    fn file_identifier_splits_directory_and_name((path, segments) in absolute_path()) {
        let file = FileIdentifier::from_path(&path).unwrap();
        let name = segments.last().unwrap();

        prop_assert_eq!(file.name().name(), name.as_str());
        prop_assert_eq!(file.full_name(), path.clone());
        prop_assert_eq!(file.as_directory(), DirectoryIdentifier::new(&path).unwrap());
        prop_assert_eq!(
            file,
            FileIdentifier::from_path(&path.to_lowercase()).unwrap()
        );
    }
}
