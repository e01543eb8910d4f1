use anyhow::anyhow;
use tickbox_app::Dom;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Document,
  Element,
  HtmlElement,
  HtmlInputElement
};

pub(crate) fn js_err(
  err: JsValue
) -> anyhow::Error {
  anyhow!("{err:?}")
}

/// The live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
  document: Document
}

impl WebDom {
  pub fn new() -> anyhow::Result<Self> {
    let document = web_sys::window()
      .and_then(|window| {
        window.document()
      })
      .ok_or_else(|| {
        anyhow!("no document available")
      })?;
    Ok(Self { document })
  }

  /// Appends a `<style>` element holding
  /// `css` to the document head.
  pub fn add_styles(
    &self,
    css: &str
  ) -> anyhow::Result<()> {
    let head = self
      .document
      .head()
      .ok_or_else(|| anyhow!("document has no <head>"))?;
    let style = self
      .document
      .create_element("style")
      .map_err(js_err)?;
    style.set_text_content(Some(css));
    head
      .append_child(&style)
      .map(|_| ())
      .map_err(js_err)
  }
}

fn as_html(
  node: &Element
) -> anyhow::Result<&HtmlElement> {
  node
    .dyn_ref::<HtmlElement>()
    .ok_or_else(|| {
      anyhow!(
        "<{}> is not an html element",
        node.tag_name()
      )
    })
}

impl Dom for WebDom {
  type Node = Element;

  fn element_by_id(
    &self,
    id: &str
  ) -> Option<Element> {
    self.document.get_element_by_id(id)
  }

  fn create_element(
    &mut self,
    tag: &str
  ) -> anyhow::Result<Element> {
    self
      .document
      .create_element(tag)
      .map_err(js_err)
  }

  fn query_all(
    &self,
    scope: &Element,
    selector: &str
  ) -> Vec<Element> {
    let Ok(list) =
      scope.query_selector_all(selector)
    else {
      tracing::warn!(selector, "invalid selector");
      return vec![];
    };
    (0..list.length())
      .filter_map(|idx| list.item(idx))
      .filter_map(|node| {
        node.dyn_into::<Element>().ok()
      })
      .collect()
  }

  fn set_inner_html(
    &mut self,
    node: &Element,
    html: &str
  ) -> anyhow::Result<()> {
    node.set_inner_html(html);
    Ok(())
  }

  fn append_child(
    &mut self,
    parent: &Element,
    child: &Element
  ) -> anyhow::Result<()> {
    parent
      .append_child(child)
      .map(|_| ())
      .map_err(js_err)
  }

  fn remove(
    &mut self,
    node: &Element
  ) -> anyhow::Result<()> {
    node.remove();
    Ok(())
  }

  fn toggle_class(
    &mut self,
    node: &Element,
    class: &str,
    on: bool
  ) -> anyhow::Result<()> {
    node
      .class_list()
      .toggle_with_force(class, on)
      .map(|_| ())
      .map_err(js_err)
  }

  fn has_class(
    &self,
    node: &Element,
    class: &str
  ) -> bool {
    node.class_list().contains(class)
  }

  fn set_shown(
    &mut self,
    node: &Element,
    shown: bool
  ) -> anyhow::Result<()> {
    let style = as_html(node)?.style();
    if shown {
      style
        .remove_property("display")
        .map(|_| ())
        .map_err(js_err)
    } else {
      style
        .set_property("display", "none")
        .map_err(js_err)
    }
  }

  fn is_shown(
    &self,
    node: &Element
  ) -> bool {
    as_html(node).is_ok_and(|el| {
      el.style()
        .get_property_value("display")
        .map_or(true, |display| {
          display != "none"
        })
    })
  }

  fn attribute(
    &self,
    node: &Element,
    name: &str
  ) -> Option<String> {
    node.get_attribute(name)
  }

  fn set_attribute(
    &mut self,
    node: &Element,
    name: &str,
    value: &str
  ) -> anyhow::Result<()> {
    node
      .set_attribute(name, value)
      .map_err(js_err)
  }

  fn value(
    &self,
    node: &Element
  ) -> String {
    node
      .dyn_ref::<HtmlInputElement>()
      .map(|input| input.value())
      .unwrap_or_default()
  }

  fn set_value(
    &mut self,
    node: &Element,
    value: &str
  ) -> anyhow::Result<()> {
    let input = node
      .dyn_ref::<HtmlInputElement>()
      .ok_or_else(|| {
        anyhow!("not an input element")
      })?;
    input.set_value(value);
    Ok(())
  }

  fn checked(
    &self,
    node: &Element
  ) -> bool {
    node
      .dyn_ref::<HtmlInputElement>()
      .is_some_and(|input| {
        input.checked()
      })
  }

  fn set_checked(
    &mut self,
    node: &Element,
    checked: bool
  ) -> anyhow::Result<()> {
    let input = node
      .dyn_ref::<HtmlInputElement>()
      .ok_or_else(|| {
        anyhow!("not an input element")
      })?;
    input.set_checked(checked);
    Ok(())
  }

  fn focus(
    &mut self,
    node: &Element
  ) -> anyhow::Result<()> {
    as_html(node)?
      .focus()
      .map_err(js_err)
  }
}
