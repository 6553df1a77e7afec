// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sat_auth::{CaptchaExtractor, HtmlForm, MetaRefresh};

const LOGIN_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head><title>Acceso</title></head>
    <body>
        <form name="IDPLogin" method="post">
            <input type="text" name="Ecom_User_ID">
            <input type="password" name="Ecom_Password">
            <input type="hidden" name="option" value="credential">
            <input type="radio" name="tipo" value="1" checked>
            <input type="radio" name="tipo" value="2">
            <select name="idioma"><option value="es" selected>Es</option><option value="en">En</option></select>
            <div id="divCaptcha"><img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII="></div>
            <input type="submit" name="submit" value="Enviar">
        </form>
    </body>
    </html>
"#;

const REFRESH_PAGE: &str =
    r#"<html><head><meta http-equiv="Refresh" content="0; url=/nidp/app/plogout?step=2"></head></html>"#;

fn form_values_benchmark(c: &mut Criterion) {
    c.bench_function("form_values", |b| {
        b.iter(|| black_box(HtmlForm::new(black_box(LOGIN_PAGE), "form").get_form_values()))
    });
}

fn captcha_benchmark(c: &mut Criterion) {
    let extractor = CaptchaExtractor::default();
    c.bench_function("captcha_image", |b| {
        b.iter(|| black_box(extractor.extract(black_box(LOGIN_PAGE)).is_ok()))
    });
}

fn meta_refresh_benchmark(c: &mut Criterion) {
    c.bench_function("meta_refresh", |b| {
        b.iter(|| {
            black_box(MetaRefresh::obtain_url(
                black_box(REFRESH_PAGE),
                "https://login.siat.sat.gob.mx/nidp/app/plogout",
            ))
        })
    });
}

criterion_group!(benches, form_values_benchmark, captcha_benchmark, meta_refresh_benchmark);
criterion_main!(benches);
