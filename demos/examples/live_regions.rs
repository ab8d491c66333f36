// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live regions: track rendered blocks in a node tree while re-rendering them.
//!
//! This example shows how to:
//! - mark the output of a "template" (a list and its items) with live ranges,
//! - replace, insert, and extract items while every enclosing range stays correct,
//! - find the region a node belongs to.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example live_regions`

use understory_live_range::{Flow, LiveRanges, Nesting, RangeId, Tag, VisitEvent};
use understory_node_tree::{NodeId, NodeKind, Tree};

/// All regions of this example share one tag so they nest with each other.
const REGIONS: Tag = Tag(1);

/// Render `label` as `<li>label</li>` inside a fresh fragment.
fn render_item(tree: &mut Tree, label: &str) -> NodeId {
    let frag = tree.create_fragment();
    let li = tree.create_element("li");
    let text = tree.create_text(label);
    tree.append_child(li, text);
    tree.append_child(frag, li);
    frag
}

fn describe(tree: &Tree, node: NodeId) -> String {
    match tree.kind(node) {
        Some(NodeKind::Element(name)) => format!("<{name}>"),
        Some(NodeKind::Text(text)) => format!("{text:?}"),
        Some(NodeKind::Comment(text)) => format!("<!--{text}-->"),
        Some(NodeKind::Fragment) | None => "#fragment".to_string(),
    }
}

/// Print the region structure inside `region`, one line per event.
fn print_regions(tree: &Tree, ranges: &LiveRanges<NodeId>, region: RangeId, names: &[(RangeId, &str)]) {
    let name = |id: RangeId| {
        names
            .iter()
            .find(|(r, _)| *r == id)
            .map_or("?", |(_, n)| *n)
    };
    println!("[{}]", name(region));
    let mut depth = 1;
    ranges.visit(tree, region, |event| {
        match event {
            VisitEvent::EnterRange(r) => {
                println!("{:indent$}[{}]", "", name(r), indent = depth * 2);
                depth += 1;
            }
            VisitEvent::LeaveRange(_) | VisitEvent::LeaveNode(_) => depth -= 1,
            VisitEvent::EnterNode(n) => {
                println!("{:indent$}{}", "", describe(tree, n), indent = depth * 2);
                depth += 1;
            }
        }
        Flow::Continue
    });
}

fn main() {
    env_logger::init();

    let mut tree = Tree::new();
    let body = tree.create_element("body");
    let heading = tree.create_element("h1");
    let list = tree.create_element("ul");
    tree.append_child(body, heading);
    tree.append_child(body, list);

    let mut ranges = LiveRanges::new();
    let mut names = Vec::new();

    // Items first; the list region over them is created afterwards and still wraps them.
    for label in ["apples", "pears"] {
        let frag = render_item(&mut tree, label);
        let li = tree.first_child(frag).expect("item fragment has an <li>");
        tree.append_child(list, frag);
        let item = ranges
            .create(&tree, REGIONS, li, li, Nesting::Outer)
            .expect("<li> is attached");
        names.push((item, label));
    }
    let items = ranges
        .create_over_children(&tree, REGIONS, list, Nesting::Outer)
        .expect("list has items");
    let page = ranges
        .create_over_children(&tree, REGIONS, body, Nesting::Outer)
        .expect("body has children");
    names.push((items, "items"));
    names.push((page, "page"));
    print_regions(&tree, &ranges, page, &names);

    // Re-render "pears"; the list region follows the new last node.
    let pears = names[1].0;
    let fresh = render_item(&mut tree, "plums");
    let old = ranges
        .replace_contents(&mut tree, pears, fresh)
        .expect("fragment is not empty");
    log::info!("old contents now live in {old:?}");
    names[1].1 = "plums";

    // Add "cherries" after the last item: inside the list region, outside "plums".
    let frag = render_item(&mut tree, "cherries");
    let cherries_li = tree.first_child(frag).expect("item fragment has an <li>");
    ranges
        .insert_after(&mut tree, pears, frag)
        .expect("item region is live");
    let cherries = ranges
        .create(&tree, REGIONS, cherries_li, cherries_li, Nesting::Outer)
        .expect("<li> is attached");
    names.push((cherries, "cherries"));

    // Remove "apples"; the list region now starts at the next item.
    let apples = names[0].0;
    let removed = ranges
        .extract(&mut tree, apples)
        .expect("list region keeps other items");
    log::info!("extracted apples into {removed:?}");
    ranges.release_subtree(&tree, removed);

    println!();
    print_regions(&tree, &ranges, page, &names);

    let text = tree
        .first_child(cherries_li)
        .expect("<li> holds its label");
    let owner = ranges.find_range(&tree, REGIONS, text);
    println!();
    println!(
        "{} belongs to {:?}",
        describe(&tree, text),
        owner.map(|r| names.iter().find(|(id, _)| *id == r).map_or("?", |(_, n)| *n))
    );
    println!(
        "parent of cherries: {:?}",
        ranges
            .find_parent(&tree, cherries, false)
            .map(|r| names.iter().find(|(id, _)| *id == r).map_or("?", |(_, n)| *n))
    );
}
