//! Page-side JavaScript
//!
//! Scripts injected over CDP. They only *observe and serialize*: error hooks
//! buffer events, the DOM extractor returns a pruned tree as JSON, pointer
//! listeners queue raw events. All derivation (selectors, xpaths, snapshots,
//! state transitions) happens on the Rust side.
//!
//! Page state lives under `window.__fixhero`. The inspector's own markers
//! (the handle attribute and highlight class) are filtered back out of
//! extracted trees so captures never include them.

/// Attribute used to address elements across the protocol
pub(crate) const HANDLE_ATTR: &str = "data-fixhero-handle";

/// Class applied to the hovered element
pub(crate) const HIGHLIGHT_CLASS: &str = "__fixhero-highlight";

/// Install the console/fetch/XHR hooks. Idempotent per page load: a second
/// evaluation returns "already" without re-wrapping. Wrapped originals are
/// always delegated to, so page behavior is unchanged.
pub(crate) const DIAGNOSTICS_INSTALL: &str = r#"
(() => {
  if (window.__fixhero && window.__fixhero.installed) return 'already';
  const state = { installed: true, console: [], network: [], inspect: null };
  window.__fixhero = state;

  const originalError = console.error;
  console.error = function (...args) {
    try {
      state.console.push({
        message: args.map((a) => String(a)).join(' '),
        stack: new Error().stack || '',
        ts: Date.now(),
      });
    } catch (ignored) {}
    return originalError.apply(console, args);
  };

  const originalFetch = window.fetch;
  window.fetch = function (input, init) {
    const method = ((init && init.method) || 'GET').toUpperCase();
    const requestUrl = typeof input === 'string' ? input : (input && input.url) || '';
    return originalFetch.apply(window, arguments).then(
      (response) => {
        if (!response.ok) {
          state.network.push({
            url: response.url || requestUrl,
            status: response.status,
            status_text: response.statusText,
            method,
            ts: Date.now(),
          });
        }
        return response;
      },
      (err) => {
        state.network.push({
          url: requestUrl,
          status: 0,
          status_text: String((err && err.message) || err),
          method,
          ts: Date.now(),
        });
        throw err;
      }
    );
  };

  const originalOpen = XMLHttpRequest.prototype.open;
  XMLHttpRequest.prototype.open = function (method, url) {
    this.addEventListener('load', () => {
      if (this.status >= 400) {
        state.network.push({
          url: String(url),
          status: this.status,
          status_text: this.statusText,
          method: String(method).toUpperCase(),
          ts: Date.now(),
        });
      }
    });
    return originalOpen.apply(this, arguments);
  };

  return 'installed';
})()
"#;

/// Drain buffered error events, emptying the page-side arrays
pub(crate) const DIAGNOSTICS_DRAIN: &str = r#"
JSON.stringify((() => {
  const state = window.__fixhero;
  if (!state) return { console: [], network: [] };
  return { console: state.console.splice(0), network: state.network.splice(0) };
})())
"#;

/// Attach capture-phase pointer listeners and the highlight style.
/// Clicks are swallowed (`preventDefault`/`stopPropagation`) while
/// inspection is active so captures never navigate away.
pub(crate) const LISTENERS_ATTACH: &str = r#"
(() => {
  const state = window.__fixhero;
  if (!state) return 'missing';
  if (state.inspect && state.inspect.active) return 'already';

  if (!document.getElementById('__fixhero-style')) {
    const style = document.createElement('style');
    style.id = '__fixhero-style';
    style.textContent =
      '.__fixhero-highlight { outline: 2px solid #e5484d !important; outline-offset: 1px !important; }';
    document.head.appendChild(style);
  }

  const inspect = { active: true, events: [], counter: 0 };
  const handleOf = (el) => {
    let handle = el.getAttribute('data-fixhero-handle');
    if (!handle) {
      handle = String(++inspect.counter);
      el.setAttribute('data-fixhero-handle', handle);
    }
    return handle;
  };

  inspect.onOver = (e) => {
    if (e.target instanceof Element) {
      inspect.events.push({ kind: 'over', handle: handleOf(e.target) });
    }
  };
  inspect.onOut = (e) => {
    if (e.target instanceof Element) {
      const handle = e.target.getAttribute('data-fixhero-handle');
      if (handle) inspect.events.push({ kind: 'out', handle });
    }
  };
  inspect.onClick = (e) => {
    e.preventDefault();
    e.stopPropagation();
    inspect.events.push({ kind: 'click' });
  };

  document.addEventListener('mouseover', inspect.onOver, true);
  document.addEventListener('mouseout', inspect.onOut, true);
  document.addEventListener('click', inspect.onClick, true);
  state.inspect = inspect;
  return 'attached';
})()
"#;

/// Detach pointer listeners and clear any residual highlight
pub(crate) const LISTENERS_DETACH: &str = r#"
(() => {
  const state = window.__fixhero;
  if (!state || !state.inspect || !state.inspect.active) return 'idle';
  const inspect = state.inspect;
  document.removeEventListener('mouseover', inspect.onOver, true);
  document.removeEventListener('mouseout', inspect.onOut, true);
  document.removeEventListener('click', inspect.onClick, true);
  document
    .querySelectorAll('.__fixhero-highlight')
    .forEach((el) => el.classList.remove('__fixhero-highlight'));
  state.inspect = null;
  return 'detached';
})()
"#;

/// Drain queued pointer events
pub(crate) const INSPECT_DRAIN: &str = r#"
JSON.stringify((() => {
  const state = window.__fixhero;
  if (!state || !state.inspect) return [];
  return state.inspect.events.splice(0);
})())
"#;

const TOGGLE_HIGHLIGHT_TEMPLATE: &str = r#"
(() => {
  const el = document.querySelector(__SELECTOR__);
  if (!el) return 'missing';
  el.classList.__OP__('__CLASS__');
  return 'ok';
})()
"#;

const DOM_CAPTURE_TEMPLATE: &str = r#"
JSON.stringify((() => {
  const target = document.querySelector(__SELECTOR__);
  if (!target) return null;

  const chain = [];
  let cursor = target;
  while (cursor && cursor !== document.body) {
    chain.unshift(cursor);
    cursor = cursor.parentElement;
  }
  if (cursor !== document.body) return null;

  const STYLES = __STYLES__;
  const attrsOf = (el) =>
    Array.from(el.attributes)
      .filter((a) => a.name !== 'data-fixhero-handle')
      .map((a) => [
        a.name,
        a.name === 'class'
          ? a.value.replace(/(^|\s)__fixhero-highlight(\s|$)/g, ' ').trim()
          : a.value,
      ]);
  const shallow = (el) => ({
    tag: el.tagName.toLowerCase(),
    attributes: attrsOf(el),
    styles: {},
    rect: { top: 0, left: 0, width: 0, height: 0 },
    text: '',
    children: [],
  });
  const deep = (el) => {
    const computed = getComputedStyle(el);
    const styles = {};
    for (const property of STYLES) styles[property] = computed.getPropertyValue(property);
    const rect = el.getBoundingClientRect();
    const text = Array.from(el.childNodes)
      .filter((n) => n.nodeType === Node.TEXT_NODE)
      .map((n) => n.textContent)
      .join('')
      .trim();
    return {
      tag: el.tagName.toLowerCase(),
      attributes: attrsOf(el),
      styles,
      rect: { top: rect.top, left: rect.left, width: rect.width, height: rect.height },
      text,
      children: Array.from(el.children).map(deep),
    };
  };
  const build = (el, depth) => {
    const node = shallow(el);
    const next = chain[depth];
    node.children = Array.from(el.children).map((child) =>
      child === next
        ? depth === chain.length - 1
          ? deep(child)
          : build(child, depth + 1)
        : shallow(child)
    );
    return node;
  };

  const path = [];
  let parent = document.body;
  for (const el of chain) {
    path.push(Array.from(parent.children).indexOf(el));
    parent = el;
  }
  const root = chain.length ? build(document.body, 0) : deep(document.body);
  return { root, target_path: path };
})())
"#;

/// CSS attribute selector addressing a handle minted by the listeners
pub(crate) fn handle_selector(handle: &str) -> String {
    format!("[{}=\"{}\"]", HANDLE_ATTR, handle)
}

pub(crate) fn highlight(handle: &str) -> String {
    toggle_highlight(handle, "add")
}

pub(crate) fn unhighlight(handle: &str) -> String {
    toggle_highlight(handle, "remove")
}

fn toggle_highlight(handle: &str, op: &str) -> String {
    TOGGLE_HIGHLIGHT_TEMPLATE
        .replace("__SELECTOR__", &quote(&handle_selector(handle)))
        .replace("__OP__", op)
        .replace("__CLASS__", HIGHLIGHT_CLASS)
}

/// DOM extraction script for an arbitrary CSS selector
pub(crate) fn dom_capture(selector: &str, style_allowlist: &[&str]) -> String {
    let styles =
        serde_json::to_string(style_allowlist).expect("string slice serializes to JSON array");
    DOM_CAPTURE_TEMPLATE
        .replace("__SELECTOR__", &quote(selector))
        .replace("__STYLES__", &styles)
}

/// Quote a string as a JavaScript literal
fn quote(text: &str) -> String {
    serde_json::to_string(text).expect("strings serialize to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_selector_shape() {
        assert_eq!(handle_selector("7"), "[data-fixhero-handle=\"7\"]");
    }

    #[test]
    fn test_highlight_scripts_target_handle() {
        let add = highlight("3");
        assert!(add.contains("classList.add"));
        assert!(add.contains("data-fixhero-handle=\\\"3\\\""));

        let remove = unhighlight("3");
        assert!(remove.contains("classList.remove"));
    }

    #[test]
    fn test_dom_capture_quotes_selector() {
        let script = dom_capture("button.save[name=\"go\"]", &["display"]);
        // The selector is embedded as a JS string literal, quotes escaped.
        assert!(script.contains(r#"document.querySelector("button.save[name=\"go\"]")"#));
        assert!(script.contains(r#"["display"]"#));
        assert!(!script.contains("__SELECTOR__"));
        assert!(!script.contains("__STYLES__"));
    }
}
