// Copyright 2025 The Econ Model API Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! RFC 5988 `Link` header values.

use super::pagination::{PageDescriptor, CURSOR_PARAM, SKIP_PARAM, TAKE_PARAM};
use super::params::encode_pairs;

/// Build the `Link` header for a page of `base_path`.
///
/// `carried` are the filter and sort parameters of the request; they are
/// repeated on every link after the paging parameters.
pub fn link_header(base_path: &str, carried: &[(String, String)], page: &PageDescriptor) -> String {
    let take = page.take.max(1);
    let mut links = Vec::new();

    let offset_link = |skip: usize| -> String {
        let mut pairs = vec![
            (SKIP_PARAM.to_string(), skip.to_string()),
            (TAKE_PARAM.to_string(), take.to_string()),
        ];
        pairs.extend_from_slice(carried);
        format!("{base_path}?{}", encode_pairs(&pairs))
    };

    if page.offset {
        if page.has_next {
            links.push((offset_link(page.skip + take), "next"));
        }
        if page.skip > 0 {
            links.push((offset_link(page.skip.saturating_sub(take)), "prev"));
        }
        links.push((offset_link(0), "first"));
        if let Some(total) = page.total {
            let last = if total == 0 {
                0
            } else {
                ((total - 1) / take as u64) as usize * take
            };
            links.push((offset_link(last), "last"));
        }
    } else {
        let cursor_link = |cursor: Option<&str>| -> String {
            let mut pairs = vec![(TAKE_PARAM.to_string(), take.to_string())];
            if let Some(cursor) = cursor {
                pairs.push((CURSOR_PARAM.to_string(), cursor.to_string()));
            }
            pairs.extend_from_slice(carried);
            format!("{base_path}?{}", encode_pairs(&pairs))
        };
        if let Some(cursor) = page.cursor.as_deref().filter(|_| page.has_next) {
            links.push((cursor_link(Some(cursor)), "next"));
        }
        links.push((cursor_link(None), "first"));
    }

    links
        .into_iter()
        .map(|(url, rel)| format!("<{url}>;rel=\"{rel}\""))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "/v1/projects/5e272d38b78910dd2a1bd691/econ-models/stream-properties";

    fn offset_page(skip: usize, take: usize, has_next: bool, total: Option<u64>) -> PageDescriptor {
        PageDescriptor {
            skip,
            take,
            total,
            has_next,
            cursor: None,
            offset: true,
        }
    }

    #[test]
    fn test_last_page_has_prev_and_first_but_no_next() {
        let header = link_header(BASE, &[], &offset_page(30, 10, false, None));
        assert_eq!(
            header,
            format!("<{BASE}?skip=20&take=10>;rel=\"prev\",<{BASE}?skip=0&take=10>;rel=\"first\"")
        );
    }

    #[test]
    fn test_first_page_has_next() {
        let carried = vec![("sort".to_string(), "-name".to_string())];
        let header = link_header(BASE, &carried, &offset_page(0, 25, true, None));
        assert!(header.contains(&format!("<{BASE}?skip=25&take=25&sort=-name>;rel=\"next\"")));
        assert!(!header.contains("rel=\"prev\""));
    }

    #[test]
    fn test_prev_never_goes_negative() {
        let header = link_header(BASE, &[], &offset_page(5, 10, false, None));
        assert!(header.contains("skip=0&take=10>;rel=\"prev\""));
    }

    #[test]
    fn test_last_from_total() {
        let header = link_header(BASE, &[], &PageDescriptor::for_count(0, 10, 35));
        assert!(header.contains("skip=30&take=10>;rel=\"last\""));
        assert!(header.contains("skip=10&take=10>;rel=\"next\""));

        let empty = link_header(BASE, &[], &PageDescriptor::for_count(0, 10, 0));
        assert!(empty.contains("skip=0&take=10>;rel=\"last\""));
    }

    #[test]
    fn test_cursor_links() {
        let page = PageDescriptor {
            skip: 0,
            take: 2,
            total: None,
            has_next: true,
            cursor: Some("ImIi".to_string()),
            offset: false,
        };
        let header = link_header(BASE, &[], &page);
        assert_eq!(
            header,
            format!("<{BASE}?take=2&cursor=ImIi>;rel=\"next\",<{BASE}?take=2>;rel=\"first\"")
        );
    }
}
