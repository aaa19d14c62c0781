/*!

# Quick start

`qa_format` keeps a whole question taxonomy in memory and drives the four
dependent selection steps (大項目 → 中項目 → 小項目 → 設問) over it. The host
surface only has to provide an [OptionPicker](crate::OptionPicker) that turns
an option list into a chosen index; everything else (option filtering,
default carry-over, fallback on stale values, the export text) is computed
here.

The smallest end-to-end run looks like this:

```
use qa_format::*;

let rows = vec![
    QuestionRow {
        major: "1サステナビリティ体制".to_string(),
        mid: "1.法令等遵守".to_string(),
        minor: "A.法令等遵守に関する方針".to_string(),
        question: "(1)法令等遵守に関する方針や行動基準を策定していますか".to_string(),
        format: "複数".to_string(),
        choice: "a.法令等遵守に関する方針はない、もしくは不明".to_string(),
        score: 0,
    },
    QuestionRow {
        major: "1サステナビリティ体制".to_string(),
        mid: "1.法令等遵守".to_string(),
        minor: "A.法令等遵守に関する方針".to_string(),
        question: "(1)法令等遵守に関する方針や行動基準を策定していますか".to_string(),
        format: "複数".to_string(),
        choice: "b.法令等遵守に関する方針がある".to_string(),
        score: 1,
    },
];
let table = TaxonomyTable::new(rows);

// DefaultPicker accepts the proposed default at every level. An interactive
// front-end would prompt the user instead.
let selection = select_question(&table, None, &mut DefaultPicker)?;

let mut store = SelectionStore::new();
store.confirm(selection);

let text = export_text(&table, &store);
assert!(text.starts_with("問1\n"));

# Ok::<(), qa_format::FormErrors>(())
```

For the command line front-end shipped with this repository, see the `qaform`
binary crate at the root of the workspace.

*/
