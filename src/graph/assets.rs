/// Embedded web assets for the workflow viewer

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Flowmap - Workflow Viewer</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
            background: #16213e;
        }

        #sidebar {
            width: 320px;
            background: #1a1a2e;
            border-left: 1px solid #333;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.4em;
            margin-bottom: 10px;
            color: #00d9ff;
        }

        h2 {
            font-size: 1.1em;
            margin: 15px 0 10px;
            color: #888;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 8px 0;
            border-bottom: 1px solid #333;
        }

        .stat-value {
            color: #00d9ff;
            font-weight: bold;
        }

        .controls {
            display: flex;
            flex-direction: column;
            gap: 8px;
        }

        .row {
            display: flex;
            gap: 6px;
        }

        input[type="text"], select {
            flex: 1;
            background: #16213e;
            color: #eee;
            border: 1px solid #333;
            border-radius: 4px;
            padding: 5px 8px;
        }

        button, .button {
            background: #0f3460;
            color: #eee;
            border: 1px solid #00d9ff55;
            border-radius: 4px;
            padding: 5px 10px;
            cursor: pointer;
            text-decoration: none;
            font-size: 0.9em;
            text-align: center;
        }

        button:hover, .button:hover {
            background: #00d9ff;
            color: #000;
        }

        button.danger:hover {
            background: #ff4444;
        }

        .palette {
            display: flex;
            flex-wrap: wrap;
            gap: 6px;
        }

        .swatch {
            display: flex;
            align-items: center;
            gap: 5px;
            padding: 3px 8px;
            border-radius: 4px;
            background: #16213e;
            cursor: pointer;
            font-size: 0.85em;
        }

        .swatch-color {
            width: 12px;
            height: 12px;
            border-radius: 3px;
        }

        #node-info {
            display: none;
            margin-top: 20px;
            padding: 15px;
            background: #16213e;
            border-radius: 8px;
        }

        #node-info.visible {
            display: block;
        }

        #node-info h3 {
            color: #00d9ff;
            margin-bottom: 10px;
            word-break: break-all;
        }

        .node-stat {
            display: flex;
            justify-content: space-between;
            padding: 5px 0;
            font-size: 0.9em;
        }

        #issues li {
            font-size: 0.85em;
            margin: 4px 0 4px 16px;
        }

        #issues li.error { color: #ff6b6b; }
        #issues li.warn { color: #ffe66d; }
        #issues li.info { color: #74b9ff; }

        #message {
            position: fixed;
            top: 10px;
            left: 50%;
            transform: translateX(-50%);
            padding: 8px 16px;
            border-radius: 4px;
            font-weight: bold;
            z-index: 9999;
            display: none;
        }

        /* SVG styles */
        .node {
            cursor: grab;
        }

        .node rect {
            stroke: #fff;
            stroke-width: 1px;
        }

        .node.pinned rect {
            stroke-dasharray: 4, 2;
        }

        .node.selected rect {
            stroke: #00d9ff;
            stroke-width: 3px;
        }

        .node text {
            font-size: 11px;
            fill: #fff;
            pointer-events: none;
        }

        .link {
            stroke-width: 2px;
            stroke-opacity: 0.8;
        }

        .static .editing {
            display: none !important;
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="graph"></div>
        <div id="sidebar">
            <h1>Flowmap</h1>

            <h2>Summary</h2>
            <div id="stats">
                <div class="stat">
                    <span>Tasks</span>
                    <span class="stat-value" id="stat-tasks">-</span>
                </div>
                <div class="stat">
                    <span>Links</span>
                    <span class="stat-value" id="stat-links">-</span>
                </div>
                <div class="stat">
                    <span>Roots</span>
                    <span class="stat-value" id="stat-roots">-</span>
                </div>
            </div>

            <h2 class="editing">Workflow</h2>
            <div class="controls editing">
                <input type="file" id="upload" accept=".json,application/json">
            </div>

            <h2>Layout</h2>
            <div class="controls">
                <select id="layout">
                    <option value="force">Force</option>
                    <option value="tree">Tree</option>
                </select>
            </div>

            <h2>Components</h2>
            <div class="palette" id="palette"></div>
            <div class="controls editing" style="margin-top: 10px">
                <input type="text" id="task-name" placeholder="Name for the next task (optional)">
                <div class="row">
                    <input type="text" id="new-type" placeholder="New component type">
                    <button id="add-type">Add type</button>
                </div>
            </div>

            <h2>Export</h2>
            <div class="controls">
                <div class="row">
                    <a class="button" id="export-json" href="#">JSON</a>
                    <a class="button" id="export-svg" href="#">SVG</a>
                    <a class="button editing" id="export-png" href="#">PNG</a>
                </div>
                <button id="copy">Copy JSON to clipboard</button>
            </div>

            <div id="node-info">
                <h3 id="node-name"></h3>
                <div class="node-stat">
                    <span>Type</span>
                    <span id="node-type">-</span>
                </div>
                <div class="node-stat">
                    <span>Fan-in</span>
                    <span id="node-fan-in">-</span>
                </div>
                <div class="node-stat">
                    <span>Fan-out</span>
                    <span id="node-fan-out">-</span>
                </div>
                <div class="row editing" style="margin-top: 10px">
                    <button id="unpin">Unpin</button>
                    <button class="danger" id="delete">Delete task</button>
                </div>
            </div>

            <h2>Issues</h2>
            <ul id="issues"></ul>
        </div>
    </div>

    <div id="message"></div>

    <script>
        const EMBEDDED = /*__FLOWMAP_DATA__*/null;

        let svg, defs, g, link, node;
        let graphData;
        let selected = null;

        function layoutKind() {
            return document.getElementById('layout').value;
        }

        function flash(text, isError) {
            const el = document.getElementById('message');
            el.textContent = text;
            el.style.background = isError ? '#ff4444' : '#00d9ff';
            el.style.color = isError ? '#fff' : '#000';
            el.style.display = 'block';
            setTimeout(() => { el.style.display = 'none'; }, 2500);
        }

        async function api(method, path, body) {
            const options = { method, headers: {} };
            if (body !== undefined) {
                options.headers['Content-Type'] = 'application/json';
                options.body = typeof body === 'string' ? body : JSON.stringify(body);
            }
            const response = await fetch(path, options);
            if (!response.ok) {
                let message = response.statusText;
                try {
                    const err = await response.json();
                    message = err.error;
                    if (err.issues && err.issues.length) {
                        showIssues(err.issues);
                    }
                } catch (_) {}
                throw new Error(message);
            }
            return response;
        }

        async function refresh() {
            if (EMBEDDED) {
                draw(EMBEDDED.graph);
                return;
            }
            const response = await api('GET', `/api/graph?layout=${layoutKind()}`);
            draw(await response.json());
        }

        function draw(data) {
            graphData = data;
            document.getElementById('stat-tasks').textContent = data.metadata.total_tasks;
            document.getElementById('stat-links').textContent = data.metadata.total_links;
            document.getElementById('stat-roots').textContent = data.metadata.root_count;
            Object.entries(data.metadata.edge_colors).forEach(([kind, color]) => {
                defs.select(`#arrow-${kind} path`).attr('fill', color);
            });
            drawPalette(data.component_types);
            showIssues(data.issues);
            updateExportLinks();

            const w = data.metadata.node_width;
            const h = data.metadata.node_height;
            const byId = new Map(data.nodes.map(n => [n.id, n]));

            link = g.select('.links')
                .selectAll('line')
                .data(data.links, d => `${d.source}-${d.target}-${d.kind}`)
                .join('line')
                .attr('class', d => `link ${d.kind}`)
                .attr('stroke', d => d.color)
                .attr('marker-end', d => `url(#arrow-${d.kind})`);

            node = g.select('.nodes')
                .selectAll('g.node')
                .data(data.nodes, d => d.id)
                .join(enter => {
                    const ng = enter.append('g').attr('class', 'node');
                    ng.append('rect');
                    ng.append('text').attr('text-anchor', 'middle').attr('dy', '.35em');
                    ng.append('title');
                    return ng;
                })
                .classed('pinned', d => d.pinned)
                .classed('selected', d => selected === d.id)
                .on('click', (event, d) => showNodeInfo(d));

            node.select('rect')
                .attr('x', -w / 2).attr('y', -h / 2)
                .attr('width', w).attr('height', h)
                .attr('rx', 6)
                .attr('fill', d => d.color);
            node.select('text').text(d => d.label);
            node.select('title').text(d => d.name || d.label);

            if (!EMBEDDED) {
                node.call(d3.drag()
                    .on('drag', dragged)
                    .on('end', dragended));
            }

            position(byId, w, h);

            if (selected && !byId.has(selected)) {
                selected = null;
                document.getElementById('node-info').classList.remove('visible');
            }
        }

        function clip(from, to, w, h) {
            const dx = to.x - from.x;
            const dy = to.y - from.y;
            if (dx === 0 && dy === 0) return to;
            const tx = dx === 0 ? Infinity : (w / 2) / Math.abs(dx);
            const ty = dy === 0 ? Infinity : (h / 2) / Math.abs(dy);
            const t = Math.min(tx, ty, 1);
            return { x: to.x - dx * t, y: to.y - dy * t };
        }

        function position(byId, w, h) {
            node.attr('transform', d => `translate(${d.x},${d.y})`);
            link.each(function(d) {
                const s = byId.get(d.source);
                const t = byId.get(d.target);
                if (!s || !t) return;
                const a = clip(t, s, w, h);
                const b = clip(s, t, w, h);
                d3.select(this)
                    .attr('x1', a.x).attr('y1', a.y)
                    .attr('x2', b.x).attr('y2', b.y);
            });
        }

        function dragged(event, d) {
            d.x = event.x;
            d.y = event.y;
            const byId = new Map(graphData.nodes.map(n => [n.id, n]));
            position(byId, graphData.metadata.node_width, graphData.metadata.node_height);
        }

        async function dragended(event, d) {
            try {
                await api('PUT', `/api/tasks/${encodeURIComponent(d.id)}/position`, { x: d.x, y: d.y });
                await refresh();
            } catch (e) {
                flash(e.message, true);
            }
        }

        function drawPalette(types) {
            const palette = d3.select('#palette')
                .selectAll('.swatch')
                .data(types, d => d.name)
                .join(enter => {
                    const s = enter.append('div').attr('class', 'swatch');
                    s.append('div').attr('class', 'swatch-color');
                    s.append('span');
                    return s;
                })
                .attr('title', EMBEDDED ? null : 'Add a task of this type')
                .on('click', (event, d) => addTask(d.name));
            palette.select('.swatch-color').style('background', d => d.color);
            palette.select('span').text(d => d.name);
        }

        function showIssues(issues) {
            d3.select('#issues')
                .selectAll('li')
                .data(issues || [])
                .join('li')
                .attr('class', d => d.severity)
                .text(d => d.message);
        }

        function showNodeInfo(d) {
            selected = d.id;
            node.classed('selected', n => n.id === selected);
            document.getElementById('node-info').classList.add('visible');
            document.getElementById('node-name').textContent = d.id;
            document.getElementById('node-type').textContent = d.type;
            document.getElementById('node-fan-in').textContent = d.fan_in;
            document.getElementById('node-fan-out').textContent = d.fan_out;
        }

        async function addTask(type) {
            if (EMBEDDED) return;
            const nameInput = document.getElementById('task-name');
            const name = nameInput.value.trim();
            try {
                const response = await api('POST', '/api/tasks', name ? { type, name } : { type });
                const created = await response.json();
                nameInput.value = '';
                flash(`Added ${created.taskId}`);
                await refresh();
            } catch (e) {
                flash(e.message, true);
            }
        }

        function download(text, mime, filename) {
            const blob = new Blob([text], { type: mime });
            const a = document.createElement('a');
            a.href = URL.createObjectURL(blob);
            a.download = filename;
            a.click();
            URL.revokeObjectURL(a.href);
        }

        function updateExportLinks() {
            if (EMBEDDED) return;
            const q = `?layout=${layoutKind()}`;
            document.getElementById('export-json').href = `/api/export/json${q}`;
            document.getElementById('export-svg').href = `/api/export/svg${q}`;
            document.getElementById('export-png').href = `/api/export/png${q}`;
        }

        function setupControls() {
            document.getElementById('layout').addEventListener('change', () => refresh());

            document.getElementById('copy').addEventListener('click', async () => {
                try {
                    const text = EMBEDDED
                        ? JSON.stringify(EMBEDDED.workflow, null, 2)
                        : await (await api('GET', '/api/workflow')).text();
                    await navigator.clipboard.writeText(text);
                    flash('Workflow JSON copied');
                } catch (e) {
                    flash(`Copy failed: ${e.message}`, true);
                }
            });

            if (EMBEDDED) {
                document.body.classList.add('static');
                document.getElementById('export-json').addEventListener('click', e => {
                    e.preventDefault();
                    download(JSON.stringify(EMBEDDED.workflow, null, 2), 'application/json', 'updated_workflow.json');
                });
                document.getElementById('export-svg').addEventListener('click', e => {
                    e.preventDefault();
                    const clone = svg.node().cloneNode(true);
                    clone.setAttribute('xmlns', 'http://www.w3.org/2000/svg');
                    download(new XMLSerializer().serializeToString(clone), 'image/svg+xml', 'workflow_visualization.svg');
                });
                return;
            }

            document.getElementById('upload').addEventListener('change', async function() {
                const file = this.files[0];
                if (!file) return;
                try {
                    await api('PUT', '/api/workflow', await file.text());
                    selected = null;
                    flash(`Loaded ${file.name}`);
                    await refresh();
                } catch (e) {
                    flash(e.message, true);
                }
                this.value = '';
            });

            document.getElementById('add-type').addEventListener('click', async () => {
                const input = document.getElementById('new-type');
                try {
                    await api('POST', '/api/types', { type: input.value });
                    input.value = '';
                    await refresh();
                } catch (e) {
                    flash(e.message, true);
                }
            });

            document.getElementById('delete').addEventListener('click', async () => {
                if (!selected) return;
                try {
                    await api('DELETE', `/api/tasks/${encodeURIComponent(selected)}`);
                    flash(`Deleted ${selected}`);
                    selected = null;
                    document.getElementById('node-info').classList.remove('visible');
                    await refresh();
                } catch (e) {
                    flash(e.message, true);
                }
            });

            document.getElementById('unpin').addEventListener('click', async () => {
                if (!selected) return;
                try {
                    await api('DELETE', `/api/tasks/${encodeURIComponent(selected)}/position`);
                    await refresh();
                } catch (e) {
                    flash(e.message, true);
                }
            });
        }

        function init() {
            const container = document.getElementById('graph');
            svg = d3.select('#graph')
                .append('svg')
                .attr('width', container.clientWidth)
                .attr('height', container.clientHeight);

            const zoom = d3.zoom()
                .scaleExtent([0.1, 4])
                .on('zoom', (event) => {
                    g.attr('transform', event.transform);
                });
            svg.call(zoom);

            defs = svg.append('defs');
            ['success', 'failure'].forEach(kind => {
                defs.append('marker')
                    .attr('id', `arrow-${kind}`)
                    .attr('viewBox', '0 -5 10 10')
                    .attr('refX', 10)
                    .attr('refY', 0)
                    .attr('orient', 'auto')
                    .attr('markerWidth', 6)
                    .attr('markerHeight', 6)
                    .append('path')
                    .attr('d', 'M0,-5L10,0L0,5');
            });

            g = svg.append('g');
            g.append('g').attr('class', 'links');
            g.append('g').attr('class', 'nodes');

            setupControls();
            refresh().catch(e => flash(e.message, true));
        }

        window.addEventListener('resize', () => {
            const container = document.getElementById('graph');
            svg.attr('width', container.clientWidth).attr('height', container.clientHeight);
        });

        init();
    </script>
</body>
</html>
"##;
