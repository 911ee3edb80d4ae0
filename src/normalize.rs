//! Tree Normalizer
//!
//! Turns the decoded declarative input into the canonical [`Tree`]: checks
//! the structural schema, resolves group references against the top-level
//! declarations, threads the shared config down and attaches a reduced
//! parent link to every non-root node.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::model::{
    Config, Group, ImportRef, LinkTag, Navigator, NavigatorKind, Node, ParentLink, Screen, Tree,
};
use crate::schema::{
    decode_params, decode_props, RawGroup, RawKind, RawNavigator, RawNode, RawScreen, RawTree,
};

pub fn normalize(raw: serde_json::Value) -> Result<Tree, DecodeError> {
    let raw: RawTree = serde_json::from_value(raw)?;

    let declarations = raw
        .groups
        .into_iter()
        .enumerate()
        .map(|(index, node)| node.into_group(&format!("groups[{index}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let normalizer = Normalizer {
        config: Arc::new(raw.config),
        declared: declarations.iter().map(|group| group.name.clone()).collect(),
    };

    let navigators = raw
        .navigators
        .into_iter()
        .enumerate()
        .map(|(index, node)| {
            let at = format!("navigators[{index}]");
            let navigator = node.into_navigator(&at)?;
            normalizer.navigator(navigator, None, &at)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groups = declarations
        .into_iter()
        .enumerate()
        .map(|(index, group)| normalizer.group(group, None, true, &format!("groups[{index}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Tree {
        config: normalizer.config,
        groups,
        navigators,
    })
}

struct Normalizer {
    config: Arc<Config>,
    /// Names of the top-level group declarations.
    declared: HashSet<String>,
}

fn located<'a>(at: &'a str, field: &'static str) -> impl FnOnce(DecodeError) -> DecodeError + 'a {
    move |error| DecodeError::new(format!("{at}.{field}: {error}"))
}

impl Normalizer {
    fn navigator(
        &self,
        raw: RawNavigator,
        parent: Option<Arc<ParentLink>>,
        at: &str,
    ) -> Result<Navigator, DecodeError> {
        let root = raw.root.unwrap_or(false);
        let link = Arc::new(ParentLink {
            tag: LinkTag::Navigator,
            name: raw.name.clone(),
            reference: false,
            root,
            parent: parent.clone(),
        });

        let children = raw
            .children
            .into_iter()
            .enumerate()
            .map(|(index, child)| self.node(child, &link, &format!("{at}.children[{index}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let kind = match raw.kind {
            None => NavigatorKind::default(),
            Some(RawKind::Builtin(builtin)) => NavigatorKind::Builtin(builtin),
            Some(RawKind::Custom(symbol, module)) => {
                NavigatorKind::Custom(ImportRef::new(symbol, module))
            }
        };

        Ok(Navigator {
            name: raw.name,
            export: raw.export.unwrap_or(false),
            root,
            path: raw.path,
            kind,
            props: decode_props(raw.props).map_err(located(at, "props"))?,
            children,
            parent,
            config: self.config.clone(),
        })
    }

    fn node(&self, raw: RawNode, parent: &Arc<ParentLink>, at: &str) -> Result<Node, DecodeError> {
        match raw {
            RawNode::Navigator(navigator) => self
                .navigator(navigator, Some(parent.clone()), at)
                .map(Node::Navigator),
            RawNode::Group(group) => {
                // Membership is checked against the full declaration set, independent of depth.
                let reference = self.declared.contains(&group.name);
                self.group(group, Some(parent.clone()), reference, at)
                    .map(Node::Group)
            }
            RawNode::Screen(screen) => self.screen(screen, parent.clone(), at).map(Node::Screen),
        }
    }

    fn group(
        &self,
        raw: RawGroup,
        parent: Option<Arc<ParentLink>>,
        reference: bool,
        at: &str,
    ) -> Result<Group, DecodeError> {
        let link = Arc::new(ParentLink {
            tag: LinkTag::Group,
            name: raw.name.clone(),
            reference,
            root: false,
            parent: parent.clone(),
        });

        let children = raw
            .children
            .into_iter()
            .enumerate()
            .map(|(index, child)| {
                let at = format!("{at}.children[{index}]");
                let screen = child.into_screen(&at)?;
                self.screen(screen, link.clone(), &at)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Group {
            name: raw.name,
            path: raw.path,
            props: decode_props(raw.props).map_err(located(at, "props"))?,
            children,
            reference,
            parent,
            config: self.config.clone(),
        })
    }

    fn screen(
        &self,
        raw: RawScreen,
        parent: Arc<ParentLink>,
        at: &str,
    ) -> Result<Screen, DecodeError> {
        Ok(Screen {
            name: raw.name,
            lazy: raw.lazy,
            kind: raw.kind.unwrap_or_default(),
            path: raw.path,
            props: decode_props(raw.props).map_err(located(at, "props"))?,
            params: raw
                .params
                .map(decode_params)
                .transpose()
                .map_err(located(at, "params"))?,
            parent,
            config: self.config.clone(),
        })
    }
}
