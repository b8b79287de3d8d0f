pub mod gemini;
pub(crate) mod http_errors;
pub mod ollama;

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// What the canned server saw: the request head and the body.
    pub(crate) struct CapturedRequest {
        pub head: String,
        pub body: String,
    }

    /// Serves exactly one HTTP response and hands back the request it got.
    pub(crate) fn serve_once(
        status_line: &'static str,
        response_body: String,
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("address should be available");

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept should succeed");
            let mut reader = BufReader::new(stream.try_clone().expect("stream should clone"));

            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("header line should read");
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().expect("content-length should parse");
                }
                head.push_str(&line);
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).expect("body should read");

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{response_body}",
                response_body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("response should write");

            CapturedRequest {
                head,
                body: String::from_utf8(body).expect("body should be utf-8"),
            }
        });

        (format!("http://{addr}"), handle)
    }
}
