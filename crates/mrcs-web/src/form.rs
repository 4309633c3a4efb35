//! 单页预测表单
//!
//! 六个带边界的输入控件加一个触发按钮，提交到预测API并就地显示
//! 风险等级或错误信息

use axum::response::Html;

/// 表单页面处理器
pub async fn form_page() -> Html<&'static str> {
    Html(FORM_HTML)
}

const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>孕产妇妊娠风险分类</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            color: #333;
        }

        .container {
            max-width: 720px;
            margin: 0 auto;
            padding: 20px;
        }

        .header {
            text-align: center;
            margin-bottom: 30px;
            color: white;
        }

        .header h1 {
            font-size: 2rem;
            margin-bottom: 10px;
            text-shadow: 0 2px 4px rgba(0,0,0,0.3);
        }

        .header p {
            font-size: 1rem;
            opacity: 0.9;
        }

        .card {
            background: white;
            border-radius: 10px;
            padding: 30px;
            box-shadow: 0 10px 30px rgba(0,0,0,0.1);
        }

        .fields {
            display: grid;
            grid-template-columns: repeat(2, 1fr);
            gap: 16px 24px;
            margin-bottom: 24px;
        }

        .field label {
            display: block;
            font-size: 0.9rem;
            color: #555;
            margin-bottom: 6px;
        }

        .field input, .field select {
            width: 100%;
            padding: 10px 12px;
            border: 1px solid #ccc;
            border-radius: 5px;
            font-size: 1rem;
        }

        button {
            width: 100%;
            padding: 12px;
            border: none;
            border-radius: 5px;
            background: #667eea;
            color: white;
            font-size: 1.1rem;
            cursor: pointer;
        }

        button:hover { background: #5568d8; }

        .result {
            margin-top: 20px;
            padding: 14px 16px;
            border-radius: 5px;
            display: none;
        }

        .result.success {
            display: block;
            background: #d4edda;
            border-left: 3px solid #28a745;
        }

        .result.error {
            display: block;
            background: #f8d7da;
            border-left: 3px solid #dc3545;
        }

        .result .hint {
            margin-top: 6px;
            font-size: 0.85rem;
            color: #666;
        }

        .footer {
            text-align: center;
            margin-top: 30px;
            color: white;
            opacity: 0.8;
        }
    </style>
</head>
<body>
    <div class="container">
        <header class="header">
            <h1>🤰 孕产妇妊娠风险分类</h1>
            <p>基于已训练的梯度提升模型，按六项临床测量值给出风险等级</p>
        </header>

        <div class="card">
            <div class="fields">
                <div class="field">
                    <label for="age">孕妇年龄（岁）</label>
                    <input id="age" type="number" min="15" max="50" step="1" value="28">
                </div>
                <div class="field">
                    <label for="diastolic_bp">舒张压 (mmHg)</label>
                    <input id="diastolic_bp" type="number" min="40" max="120" step="1" value="80">
                </div>
                <div class="field">
                    <label for="systolic_bp">收缩压 (mmHg)</label>
                    <input id="systolic_bp" type="number" min="70" max="180" step="1" value="120">
                </div>
                <div class="field">
                    <label for="hemoglobin">血红蛋白 (g/dL)</label>
                    <input id="hemoglobin" type="number" min="5.0" max="19.0" step="0.1" value="12.0">
                </div>
                <div class="field">
                    <label for="gravida">妊娠次数</label>
                    <input id="gravida" type="number" min="1" max="10" step="1" value="1">
                </div>
                <div class="field">
                    <label for="nutritional_status">营养状况</label>
                    <select id="nutritional_status">
                        <option value="Normal">正常</option>
                        <option value="Underweight">偏瘦</option>
                        <option value="Overweight">超重</option>
                        <option value="Obese">肥胖</option>
                        <option value="Severely Underweight">严重消瘦</option>
                    </select>
                </div>
            </div>

            <button id="classify">分类风险</button>

            <div id="result" class="result"></div>
        </div>

        <footer class="footer">
            <p>MRCS - Maternal Risk Classification Service</p>
        </footer>
    </div>

    <script>
        document.getElementById('classify').addEventListener('click', async function() {
            const result = document.getElementById('result');
            result.className = 'result';

            const body = {
                age: Number(document.getElementById('age').value),
                systolic_bp: Number(document.getElementById('systolic_bp').value),
                diastolic_bp: Number(document.getElementById('diastolic_bp').value),
                gravida: Number(document.getElementById('gravida').value),
                hemoglobin: Number(document.getElementById('hemoglobin').value),
                nutritional_status: document.getElementById('nutritional_status').value
            };

            try {
                const response = await fetch('/api/v1/predict', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(body)
                });
                const data = await response.json();

                if (response.ok) {
                    result.className = 'result success';
                    result.innerHTML = '风险等级: <strong>' + data.risk_level + '</strong>';
                } else {
                    result.className = 'result error';
                    result.innerHTML = data.message +
                        (data.hint ? '<div class="hint">' + data.hint + '</div>' : '');
                }
            } catch (error) {
                result.className = 'result error';
                result.textContent = '请求失败: ' + error;
            }
        });
    </script>
</body>
</html>"#;
